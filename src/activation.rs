use std::fmt::{self, Debug};

use self::activation_functions::{Sigmoid, Tanh};
use crate::Vector;

/// Runtime handle to an activation function and its derivative.
#[derive(Clone, Copy)]
pub struct DynActivationFunction {
    name: &'static str,
    apply: fn(f32) -> f32,
    deriv: fn(f32) -> f32,
}

impl Debug for DynActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Debug::fmt(self.name, f)
    }
}

impl DynActivationFunction {
    pub fn new<Phi: ActivationFunction>(_: Phi) -> Self {
        Self {
            name: Phi::NAME,
            apply: Phi::apply,
            deriv: Phi::deriv,
        }
    }

    /// Builds an activation from a plain function pair.
    /// `deriv` receives the pre-activation value, like `ActivationFunction::deriv`.
    pub fn from_fns(name: &'static str, apply: fn(f32) -> f32, deriv: fn(f32) -> f32) -> Self {
        Self { name, apply, deriv }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, x: f32) -> f32 {
        (self.apply)(x)
    }

    pub fn deriv(&self, x: f32) -> f32 {
        (self.deriv)(x)
    }

    pub fn apply_vector<const N: usize>(&self, x: &Vector<N>) -> Vector<N> {
        x.transform(self.apply)
    }

    pub fn deriv_vector<const N: usize>(&self, x: &Vector<N>) -> Vector<N> {
        x.transform(self.deriv)
    }
}

pub trait ActivationFunction: Send + Sync + 'static {
    const NAME: &'static str;

    fn apply(x: f32) -> f32;

    /// Derivative at pre-activation `x`.
    fn deriv(x: f32) -> f32;
}

/// The two squashing functions of a cell.
#[derive(Debug, Clone, Copy)]
pub struct ActivationPair {
    /// Primary activation, applied to the forget pre-activation and the cell state.
    pub phi: DynActivationFunction,
    /// Gate activation, applied to the candidate and the input and output gates.
    pub sigma: DynActivationFunction,
}

impl Default for ActivationPair {
    fn default() -> Self {
        Self {
            phi: DynActivationFunction::new(Tanh),
            sigma: DynActivationFunction::new(Sigmoid),
        }
    }
}

pub mod activation_functions {
    use super::ActivationFunction;

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Identity;
    impl ActivationFunction for Identity {
        const NAME: &'static str = "identity";

        fn apply(x: f32) -> f32 {
            x
        }

        fn deriv(_: f32) -> f32 {
            1.0
        }
    }

    fn sigmoid(x: f32) -> f32 {
        1.0 / (1.0 + f32::exp(-x))
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Sigmoid;
    impl ActivationFunction for Sigmoid {
        const NAME: &'static str = "sigmoid";

        fn apply(x: f32) -> f32 {
            sigmoid(x)
        }

        fn deriv(x: f32) -> f32 {
            let s = sigmoid(x);
            s * (1.0 - s)
        }
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Tanh;
    impl ActivationFunction for Tanh {
        const NAME: &'static str = "tanh";

        fn apply(x: f32) -> f32 {
            f32::tanh(x)
        }

        fn deriv(x: f32) -> f32 {
            1.0 - f32::tanh(x).powi(2)
        }
    }
}
