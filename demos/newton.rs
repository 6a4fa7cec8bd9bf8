use adnum::{ad, jacobian};

/// Newton's method on x^2 + y^2 = 4, x y = 1, with the Jacobian taken
/// automatically at every iterate.
fn main() {
    let mut guess = [2., 0.3];
    for iter in 0..20 {
        let p = ad(guess);
        let x = p.at(0).unwrap();
        let y = p.at(1).unwrap();
        let f0 = &(&(&x * &x) + &(&y * &y)) - 4.;
        let f1 = &(&x * &y) - 1.;

        let r = [
            f0.nom().as_scalar().unwrap(),
            f1.nom().as_scalar().unwrap(),
        ];
        let j = jacobian(&[f0, f1]).unwrap();

        // Cramer's rule on the 2x2 step J d = r.
        let det = j[0] * j[3] - j[1] * j[2];
        guess[0] -= (j[3] * r[0] - j[1] * r[1]) / det;
        guess[1] -= (j[0] * r[1] - j[2] * r[0]) / det;

        let err = r[0].hypot(r[1]);
        println!(
            "iter {iter}: x = {:.12}, y = {:.12}, |f| = {err:.3e}",
            guess[0], guess[1]
        );
        if err < 1e-12 {
            break;
        }
    }
}
