use std::{
    fmt::{self, Debug, Display},
    iter,
};

use crate::{Gate, GateRef};

/// Renders one gate's parameters as the equation the forward pass evaluates, e.g.
///
/// ```text
/// i = sigmoid([ 0.1000 -0.2000] x + [ 0.0500] y_prev + [ 0.3000] ⊙ c_prev + [ 0.0000])
/// ```
pub struct PrettyPrintGate<'a, const I: usize, const O: usize> {
    gate: GateRef<'a, I, O>,
    activation_name: &'static str,
}

impl<'a, const I: usize, const O: usize> PrettyPrintGate<'a, I, O> {
    pub fn new(gate: GateRef<'a, I, O>, activation_name: &'static str) -> Self {
        Self {
            gate,
            activation_name,
        }
    }
}

impl<const I: usize, const O: usize> Debug for PrettyPrintGate<'_, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

fn write_row<'a>(f: &mut fmt::Formatter, elements: impl Iterator<Item = &'a f32>) -> fmt::Result {
    write!(f, "[")?;
    let mut iter = elements.peekable();
    while let Some(&element) = iter.next() {
        if element.is_sign_positive() {
            write!(f, " {:.04?}", element)?;
        } else {
            write!(f, "{:.04?}", element)?;
        }
        if iter.peek().is_some() {
            write!(f, " ")?;
        }
    }
    write!(f, "]")
}

/// Writes `text` on the center line, the same number of spaces elsewhere.
fn write_label(f: &mut fmt::Formatter, is_center_line: bool, text: &str) -> fmt::Result {
    if is_center_line {
        write!(f, "{text}")
    } else {
        write!(f, "{:width$}", "", width = text.chars().count())
    }
}

impl<const I: usize, const O: usize> Display for PrettyPrintGate<'_, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let gate = self.gate;
        let center_line = O / 2;
        let prefix = format!("{} = {}(", gate.gate.name(), self.activation_name);
        // The output gate peeks at the fresh cell state, the others at the previous one.
        let peep_label = match gate.gate {
            Gate::O => " ⊙ c + ",
            Gate::Z | Gate::I | Gate::F => " ⊙ c_prev + ",
        };
        for i_line in 0..O {
            let is_center_line = i_line == center_line;
            write_label(f, is_center_line, &prefix)?;
            write_row(f, gate.w[i_line].iter())?;
            write_label(f, is_center_line, " x + ")?;
            write_row(f, gate.u[i_line].iter())?;
            write_label(f, is_center_line, " y_prev + ")?;
            if let Some(peep) = gate.peep {
                write_row(f, iter::once(&peep[i_line]))?;
                write_label(f, is_center_line, peep_label)?;
            }
            write_row(f, iter::once(&gate.b[i_line]))?;
            if is_center_line {
                write!(f, ")")?;
            }
            if i_line != O - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
