//! Channel routing between host ports and track channels.
//!
//! The [`RoutingMap`] is derived once from the track configurations and is
//! the only source of the matrix's host channel counts:
//!
//! - `n_inputs` is the number of distinct host inputs referenced by any
//!   [`InputRoute`]. Referenced indices must be `0..n_inputs` with no gaps.
//! - `n_outputs` is the number of distinct port names referenced by any
//!   [`OutputRoute`]; output indices follow first appearance (track order,
//!   then route order).
//!
//! Several routes reading the same host input fan out; several routes
//! landing on the same track channel or output port are summed.

use std::collections::BTreeSet;

use crate::error::RoutingError;
use crate::track::TrackConfig;

/// Host input → track channel assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputRoute {
    /// Host input index.
    pub host_input: usize,
    /// Destination channel of the track.
    pub channel: usize,
}

/// Track channel → named host output assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputRoute {
    /// Source channel of the track.
    pub channel: usize,
    /// Name of the host output port.
    pub port: String,
}

/// A resolved route between a host channel and a track channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Host input or output index.
    pub host: usize,
    /// Track index in the matrix.
    pub track: usize,
    /// Channel within the track.
    pub channel: usize,
}

/// Resolved routing of a whole matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutingMap {
    inputs: Vec<Connection>,
    outputs: Vec<Connection>,
    output_ports: Vec<String>,
    n_inputs: usize,
}

impl RoutingMap {
    /// Resolves and validates the routes declared by `tracks`.
    ///
    /// # Errors
    ///
    /// See [`RoutingError`]: routes to channels a track does not have, empty
    /// port names, and gaps in the host input numbering.
    pub fn from_tracks(tracks: &[TrackConfig]) -> Result<Self, RoutingError> {
        let mut map = Self::default();
        let mut host_inputs = BTreeSet::new();

        for (track_index, track) in tracks.iter().enumerate() {
            for route in &track.inputs {
                if route.channel >= track.channels {
                    return Err(RoutingError::InputChannelOutOfRange {
                        track: track.name.clone(),
                        channel: route.channel,
                        channels: track.channels,
                    });
                }
                host_inputs.insert(route.host_input);
                map.inputs.push(Connection {
                    host: route.host_input,
                    track: track_index,
                    channel: route.channel,
                });
            }

            for route in &track.outputs {
                if route.channel >= track.channels {
                    return Err(RoutingError::OutputChannelOutOfRange {
                        track: track.name.clone(),
                        channel: route.channel,
                        channels: track.channels,
                    });
                }
                let port = route.port.trim();
                if port.is_empty() {
                    return Err(RoutingError::EmptyPortName {
                        track: track.name.clone(),
                    });
                }
                let host = map.port_index_or_insert(port);
                map.outputs.push(Connection {
                    host,
                    track: track_index,
                    channel: route.channel,
                });
            }
        }

        // Sorted set: the first index that differs from its position is the gap.
        if let Some(missing) = host_inputs
            .iter()
            .enumerate()
            .find_map(|(expected, &index)| (expected != index).then_some(expected))
        {
            return Err(RoutingError::MissingHostInput(missing));
        }
        map.n_inputs = host_inputs.len();

        Ok(map)
    }

    fn port_index_or_insert(&mut self, port: &str) -> usize {
        if let Some(index) = self.output_ports.iter().position(|p| p == port) {
            return index;
        }
        self.output_ports.push(port.to_string());
        self.output_ports.len() - 1
    }

    /// Number of distinct host inputs referenced by the map.
    #[inline]
    pub fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    /// Number of distinct host outputs referenced by the map.
    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.output_ports.len()
    }

    /// Name of host output `index`.
    pub fn output_port_name(&self, index: usize) -> Option<&str> {
        self.output_ports.get(index).map(String::as_str)
    }

    /// All output port names in host index order.
    pub fn output_port_names(&self) -> &[String] {
        &self.output_ports
    }

    /// Host input → track channel connections.
    pub fn inputs(&self) -> &[Connection] {
        &self.inputs
    }

    /// Track channel → host output connections.
    pub fn outputs(&self) -> &[Connection] {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_has_no_channels() {
        let map = RoutingMap::from_tracks(&[]).unwrap();
        assert_eq!(map.n_inputs(), 0);
        assert_eq!(map.n_outputs(), 0);
        assert!(map.output_port_name(0).is_none());
    }

    #[test]
    fn counts_distinct_host_channels() {
        let tracks = [
            TrackConfig::new("a", 2)
                .with_input(0, 0)
                .with_input(1, 1)
                .with_output(0, "left")
                .with_output(1, "right"),
            TrackConfig::new("b", 1)
                .with_input(0, 0)
                .with_output(0, "left"),
        ];
        let map = RoutingMap::from_tracks(&tracks).unwrap();
        assert_eq!(map.n_inputs(), 2);
        assert_eq!(map.n_outputs(), 2);
        assert_eq!(map.inputs().len(), 3);
        assert_eq!(map.outputs().len(), 3);
    }

    #[test]
    fn output_ports_indexed_by_first_appearance() {
        let tracks = [
            TrackConfig::new("a", 1).with_output(0, "monitor"),
            TrackConfig::new("b", 2)
                .with_output(0, "main")
                .with_output(1, "monitor"),
        ];
        let map = RoutingMap::from_tracks(&tracks).unwrap();
        assert_eq!(map.output_port_names(), &["monitor".to_string(), "main".to_string()]);
        assert_eq!(
            map.outputs()[2],
            Connection {
                host: 0,
                track: 1,
                channel: 1
            }
        );
    }

    #[test]
    fn rejects_gap_in_host_inputs() {
        let tracks = [TrackConfig::new("a", 2).with_input(0, 0).with_input(2, 1)];
        assert_eq!(
            RoutingMap::from_tracks(&tracks),
            Err(RoutingError::MissingHostInput(1))
        );
    }

    #[test]
    fn rejects_input_channel_out_of_range() {
        let tracks = [TrackConfig::new("a", 2).with_input(0, 2)];
        assert!(matches!(
            RoutingMap::from_tracks(&tracks),
            Err(RoutingError::InputChannelOutOfRange { channel: 2, channels: 2, .. })
        ));
    }

    #[test]
    fn rejects_output_channel_out_of_range() {
        let tracks = [TrackConfig::new("a", 1).with_output(3, "out")];
        assert!(matches!(
            RoutingMap::from_tracks(&tracks),
            Err(RoutingError::OutputChannelOutOfRange { channel: 3, .. })
        ));
    }

    #[test]
    fn rejects_blank_port_name() {
        let tracks = [TrackConfig::new("a", 1).with_output(0, "  ")];
        assert_eq!(
            RoutingMap::from_tracks(&tracks),
            Err(RoutingError::EmptyPortName {
                track: "a".to_string()
            })
        );
    }

    #[test]
    fn port_names_are_trimmed() {
        let tracks = [
            TrackConfig::new("a", 1).with_output(0, " main "),
            TrackConfig::new("b", 1).with_output(0, "main"),
        ];
        let map = RoutingMap::from_tracks(&tracks).unwrap();
        assert_eq!(map.n_outputs(), 1);
        assert_eq!(map.output_port_name(0), Some("main"));
    }
}
