/// The fixed table of supported elementary functions.
///
/// Each entry carries its ordinary scalar evaluation and its closed-form
/// first derivative at a point. The multivariate engine consumes both
/// directly through the chain rule; the univariate engine uses `eval`
/// for the order-0 seed and drives the Taylor recurrences from each
/// function's governing ODE instead of `grad`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Rule {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
    Sinh,
    Cosh,
    Tanh,
    Asin,
    Acos,
    Atan,
    Abs,
}

impl Rule {
    pub(crate) fn eval(self, x: f64) -> f64 {
        match self {
            Rule::Sin => x.sin(),
            Rule::Cos => x.cos(),
            Rule::Tan => x.tan(),
            Rule::Exp => x.exp(),
            Rule::Ln => x.ln(),
            Rule::Sqrt => x.sqrt(),
            Rule::Sinh => x.sinh(),
            Rule::Cosh => x.cosh(),
            Rule::Tanh => x.tanh(),
            Rule::Asin => x.asin(),
            Rule::Acos => x.acos(),
            Rule::Atan => x.atan(),
            Rule::Abs => x.abs(),
        }
    }

    /// First derivative at `x`.
    pub(crate) fn grad(self, x: f64) -> f64 {
        match self {
            Rule::Sin => x.cos(),
            Rule::Cos => -x.sin(),
            Rule::Tan => {
                let c = x.cos();
                1. / (c * c)
            }
            Rule::Exp => x.exp(),
            Rule::Ln => 1. / x,
            Rule::Sqrt => 0.5 / x.sqrt(),
            Rule::Sinh => x.cosh(),
            Rule::Cosh => x.sinh(),
            Rule::Tanh => {
                let c = x.cosh();
                1. / (c * c)
            }
            Rule::Asin => 1. / (1. - x * x).sqrt(),
            Rule::Acos => -1. / (1. - x * x).sqrt(),
            Rule::Atan => 1. / (1. + x * x),
            Rule::Abs => x.signum(),
        }
    }
}

#[test]
fn test_rule_grads() {
    // Every rule's grad against a central difference at a generic point.
    let rules = [
        Rule::Sin,
        Rule::Cos,
        Rule::Tan,
        Rule::Exp,
        Rule::Ln,
        Rule::Sqrt,
        Rule::Sinh,
        Rule::Cosh,
        Rule::Tanh,
        Rule::Asin,
        Rule::Acos,
        Rule::Atan,
        Rule::Abs,
    ];
    let x = 0.37;
    let h = 1e-6;
    for rule in rules {
        let est = (rule.eval(x + h) - rule.eval(x - h)) / (2. * h);
        assert!(
            (rule.grad(x) - est).abs() < 1e-6,
            "{rule:?}: {} vs {est}",
            rule.grad(x)
        );
    }
}

#[test]
fn test_domain_edges_are_ieee() {
    assert!(Rule::Sqrt.eval(-1.).is_nan());
    assert!(Rule::Ln.eval(0.).is_infinite());
    assert!(Rule::Ln.grad(0.).is_infinite());
    assert!(Rule::Asin.grad(2.).is_nan());
}
