//! Host port layout.
//!
//! The matrix decides how many ports exist: one input port per routed host
//! input (`input_0`, `input_1`, ...) and one output port per distinct output
//! name, in host index order.

use std::fmt;

use audio_matrix_core::SharedMatrix;

use crate::{Error, Result};

/// Maximum number of ports registered on either side.
pub const MAX_PORTS: usize = 64;

/// Side of the host connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    /// Host → matrix.
    Input,
    /// Matrix → host.
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
        })
    }
}

/// Name of host input port `index`.
pub fn input_port_name(index: usize) -> String {
    format!("input_{index}")
}

/// Port names registered with the host, in host index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortLayout {
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl PortLayout {
    /// Derives the layout from a matrix.
    ///
    /// # Errors
    ///
    /// [`Error::TooManyPorts`] when either side exceeds [`MAX_PORTS`].
    pub fn from_matrix(matrix: &SharedMatrix) -> Result<Self> {
        let outputs = (0..matrix.n_output_channels())
            .filter_map(|i| matrix.output_port_name(i).map(str::to_string))
            .collect();
        Self::new(matrix.n_input_channels(), outputs)
    }

    /// Builds a layout from an input count and the output names.
    pub fn new(n_inputs: usize, outputs: Vec<String>) -> Result<Self> {
        check_count(PortDirection::Input, n_inputs)?;
        check_count(PortDirection::Output, outputs.len())?;
        Ok(Self {
            inputs: (0..n_inputs).map(input_port_name).collect(),
            outputs,
        })
    }

    /// Input port names.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Output port names.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Number of input ports.
    pub fn n_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output ports.
    pub fn n_outputs(&self) -> usize {
        self.outputs.len()
    }
}

impl fmt::Display for PortLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "inputs ({}):", self.inputs.len())?;
        for (index, name) in self.inputs.iter().enumerate() {
            writeln!(f, "  [{index}] {name}")?;
        }
        writeln!(f, "outputs ({}):", self.outputs.len())?;
        for (index, name) in self.outputs.iter().enumerate() {
            writeln!(f, "  [{index}] {name}")?;
        }
        Ok(())
    }
}

fn check_count(direction: PortDirection, requested: usize) -> Result<()> {
    if requested > MAX_PORTS {
        return Err(Error::TooManyPorts {
            direction,
            requested,
            max: MAX_PORTS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use audio_matrix_core::{AudioMatrix, MatrixConfig, TrackConfig};

    #[test]
    fn layout_from_matrix() {
        let config = MatrixConfig::new(vec![
            TrackConfig::new("a", 2)
                .with_input(0, 0)
                .with_input(1, 1)
                .with_output(0, "main_left")
                .with_output(1, "main_right"),
            TrackConfig::new("b", 1)
                .with_input(2, 0)
                .with_output(0, "cue"),
        ]);
        let matrix = SharedMatrix::new(AudioMatrix::new(&config).unwrap());
        let layout = PortLayout::from_matrix(&matrix).unwrap();
        assert_eq!(layout.inputs(), &["input_0", "input_1", "input_2"]);
        assert_eq!(layout.outputs(), &["main_left", "main_right", "cue"]);
    }

    #[test]
    fn too_many_inputs_is_fatal() {
        let err = PortLayout::new(MAX_PORTS + 1, Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::TooManyPorts {
                direction: PortDirection::Input,
                requested: 65,
                max: MAX_PORTS
            }
        ));
        assert!(err.to_string().contains("no more ports available"));
    }

    #[test]
    fn too_many_outputs_is_fatal() {
        let outputs = (0..=MAX_PORTS).map(|i| format!("out_{i}")).collect();
        assert!(matches!(
            PortLayout::new(0, outputs),
            Err(Error::TooManyPorts {
                direction: PortDirection::Output,
                ..
            })
        ));
    }

    #[test]
    fn exactly_max_ports_is_allowed() {
        let outputs = (0..MAX_PORTS).map(|i| format!("out_{i}")).collect();
        let layout = PortLayout::new(MAX_PORTS, outputs).unwrap();
        assert_eq!(layout.n_inputs(), MAX_PORTS);
        assert_eq!(layout.n_outputs(), MAX_PORTS);
    }

    #[test]
    fn display_lists_ports() {
        let layout = PortLayout::new(1, vec!["main".to_string()]).unwrap();
        let text = layout.to_string();
        assert!(text.contains("[0] input_0"));
        assert!(text.contains("outputs (1):"));
        assert!(text.contains("[0] main"));
    }
}
