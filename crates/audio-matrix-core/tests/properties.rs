//! Property-based tests for audio-matrix-core.
//!
//! Randomized routings and signals check the invariants the host relies on:
//! derived channel counts, exact gain scaling, summing at shared ports and
//! silence beyond the valid frames of a short block.

use std::collections::BTreeSet;

use audio_matrix_core::{AudioMatrix, HostAudioConfig, MatrixConfig, ModuleConfig, TrackConfig};
use proptest::prelude::*;

/// Routes for one track: (host input, channel) and (channel, port index).
type TrackRoutes = (usize, Vec<(usize, usize)>, Vec<(usize, usize)>);

/// Tracks with 1-4 channels, each with up to 6 input and output routes.
/// Host inputs are drawn from `0..8` and port indices from `0..6`.
fn tracks_strategy() -> impl Strategy<Value = Vec<TrackRoutes>> {
    prop::collection::vec(
        (1usize..=4).prop_flat_map(|channels| {
            (
                Just(channels),
                prop::collection::vec((0usize..8, 0..channels), 0..6),
                prop::collection::vec((0..channels, 0usize..6), 0..6),
            )
        }),
        0..5,
    )
}

/// Renumbers the referenced host inputs densely so the routing has no gaps.
fn build_config(tracks: &[TrackRoutes]) -> MatrixConfig {
    let used: BTreeSet<usize> = tracks
        .iter()
        .flat_map(|(_, inputs, _)| inputs.iter().map(|&(host, _)| host))
        .collect();
    let dense = |host: usize| used.iter().position(|&h| h == host).unwrap_or(0);

    let configs = tracks
        .iter()
        .enumerate()
        .map(|(i, (channels, inputs, outputs))| {
            let mut track = TrackConfig::new(format!("track_{i}"), *channels);
            for &(host, channel) in inputs {
                track = track.with_input(dense(host), channel);
            }
            for &(channel, port) in outputs {
                track = track.with_output(channel, format!("port_{port}"));
            }
            track
        })
        .collect();
    MatrixConfig::new(configs)
}

/// Ordinary levels, the full finite range, and the edge values of `f32`.
fn sample_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![
        4 => -1.0f32..=1.0,
        2 => -f32::MAX..=f32::MAX,
        1 => prop::sample::select(vec![
            0.0,
            -0.0,
            1e38,
            -1e38,
            f32::MAX,
            -f32::MAX,
            f32::MIN_POSITIVE,
            -f32::MIN_POSITIVE,
        ]),
    ]
}

/// Runs `signal` through a one-track matrix holding a single gain.
fn render_gain(factor: f32, signal: &[f32]) -> Vec<f32> {
    let frames = signal.len();
    let config = MatrixConfig::new(vec![
        TrackConfig::new("t", 1)
            .with_module(ModuleConfig::gain(factor))
            .with_input(0, 0)
            .with_output(0, "out"),
    ]);
    let mut matrix = AudioMatrix::new(&config).unwrap();
    matrix.prepare(HostAudioConfig::new(frames, 48000).unwrap());

    let mut outputs = [vec![0.0f32; frames]];
    matrix.process(&[signal], &mut outputs, frames);
    let [out] = outputs;
    out
}

/// Bit-identical samples. Routing sums onto silence, so a negative zero
/// comes out as positive zero.
fn same_sample(out: f32, expected: f32) -> bool {
    out.to_bits() == expected.to_bits() || (out == 0.0 && expected == 0.0)
}

/// Zero, negative and near-limit levels against a handful of factors.
#[test]
fn gain_edge_values() {
    let signal = [
        0.0,
        -0.0,
        0.5,
        -0.5,
        1e38,
        -1e38,
        f32::MAX,
        -f32::MAX,
        f32::MAX / 2.0,
    ];
    for factor in [0.0, 1.0, -1.0, 0.5, 2.0, -4.0] {
        let outputs = render_gain(factor, &signal);
        for (&out, &input) in outputs.iter().zip(&signal) {
            assert!(
                same_sample(out, input * factor),
                "{input} * {factor} gave {out}"
            );
        }
    }

    let overflow = render_gain(4.0, &[f32::MAX, -1e38]);
    assert_eq!(overflow, vec![f32::INFINITY, f32::NEG_INFINITY]);
    let overflow = render_gain(-4.0, &[f32::MAX]);
    assert_eq!(overflow, vec![f32::NEG_INFINITY]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Input count is the number of distinct host inputs, output count the
    /// number of distinct port names.
    #[test]
    fn channel_counts_match_distinct_references(tracks in tracks_strategy()) {
        let config = build_config(&tracks);
        let matrix = AudioMatrix::new(&config).unwrap();

        let inputs: BTreeSet<usize> = config
            .tracks
            .iter()
            .flat_map(|t| t.inputs.iter().map(|r| r.host_input))
            .collect();
        let ports: BTreeSet<&str> = config
            .tracks
            .iter()
            .flat_map(|t| t.outputs.iter().map(|r| r.port.as_str()))
            .collect();

        prop_assert_eq!(matrix.n_input_channels(), inputs.len());
        prop_assert_eq!(matrix.n_output_channels(), ports.len());
        for index in 0..matrix.n_output_channels() {
            let name = matrix.output_port_name(index).unwrap();
            prop_assert!(ports.contains(name));
        }
    }

    /// A single-gain track scales every sample by exactly the gain factor,
    /// across the whole finite range, including overflow to infinity.
    #[test]
    fn gain_scales_exactly(
        factor in -4.0f32..4.0,
        signal in prop::collection::vec(sample_strategy(), 1..256),
    ) {
        let outputs = render_gain(factor, &signal);
        for (&out, &input) in outputs.iter().zip(&signal) {
            prop_assert!(same_sample(out, input * factor), "{input} * {factor} gave {out}");
        }
    }

    /// Chained gains compose multiplicatively, in order.
    #[test]
    fn chained_gains_compose(
        factors in prop::collection::vec(0.25f32..2.0, 1..6),
        value in -1.0f32..=1.0,
    ) {
        let mut track = TrackConfig::new("t", 1).with_input(0, 0).with_output(0, "out");
        for &factor in &factors {
            track = track.with_module(ModuleConfig::gain(factor));
        }
        let mut matrix = AudioMatrix::new(&MatrixConfig::new(vec![track])).unwrap();
        matrix.prepare(HostAudioConfig::new(4, 48000).unwrap());

        let mut outputs = [[0.0f32; 4]];
        matrix.process(&[[value; 4]], &mut outputs, 4);
        let expected = factors.iter().fold(value, |acc, f| acc * f);
        for &out in &outputs[0] {
            prop_assert_eq!(out, expected);
        }
    }

    /// N unity tracks reading host input 0 and writing one port sum to N times the input.
    #[test]
    fn shared_port_sums_all_tracks(n_tracks in 1usize..8, value in -1.0f32..=1.0) {
        let tracks = (0..n_tracks)
            .map(|i| {
                TrackConfig::new(format!("t{i}"), 1)
                    .with_input(0, 0)
                    .with_output(0, "bus")
            })
            .collect();
        let mut matrix = AudioMatrix::new(&MatrixConfig::new(tracks)).unwrap();
        matrix.prepare(HostAudioConfig::new(8, 48000).unwrap());

        let mut outputs = [[0.0f32; 8]];
        matrix.process(&[[value; 8]], &mut outputs, 8);
        let expected = (0..n_tracks).fold(0.0f32, |acc, _| acc + value);
        for &out in &outputs[0] {
            prop_assert!((out - expected).abs() < 1e-5);
        }
    }

    /// Frames past `nframes` are silent in every output.
    #[test]
    fn short_blocks_leave_silent_tail(block_size in 1usize..128, cut in 0usize..128) {
        let nframes = cut.min(block_size);
        let config = MatrixConfig::new(vec![
            TrackConfig::new("t", 1).with_input(0, 0).with_output(0, "out"),
        ]);
        let mut matrix = AudioMatrix::new(&config).unwrap();
        matrix.prepare(HostAudioConfig::new(block_size, 48000).unwrap());

        let mut outputs = [vec![3.0f32; block_size]];
        matrix.process(&[vec![1.0f32; block_size]], &mut outputs, nframes);
        prop_assert!(outputs[0][..nframes].iter().all(|&s| s == 1.0));
        prop_assert!(outputs[0][nframes..].iter().all(|&s| s == 0.0));
    }
}
