use std::io::Write;

use adnum::{adn, taylorfunc, Adn};

fn square_exp(x: &Adn) -> Adn {
    (-(x * x)).exp()
}

/// Expands exp(-x^2) around x = 0.5 at a few truncation orders and
/// dumps the approximants next to the true curve for plotting.
fn main() {
    let at = 0.5;
    let t2 = taylorfunc(&square_exp(&adn(at, 2)), at);
    let t4 = taylorfunc(&square_exp(&adn(at, 4)), at);
    let t8 = taylorfunc(&square_exp(&adn(at, 8)), at);

    let mut f = std::io::BufWriter::new(std::fs::File::create("taylor.csv").unwrap());
    writeln!(f, "x, exp(-x^2), order 2, order 4, order 8").unwrap();
    for i in -20..=40 {
        let x = i as f64 / 20.;
        let exact = (-x * x).exp();
        writeln!(
            f,
            "{x}, {exact}, {}, {}, {}",
            t2.eval(x),
            t4.eval(x),
            t8.eval(x)
        )
        .unwrap();
    }
    println!("wrote taylor.csv");
}
