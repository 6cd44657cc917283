//! Integration tests for the cascade pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cascade_config::{EffectSpec, PipelineConfig, Preset};
use cascade_core::{
    Diagnostics, EffectFailure, EffectFlags, EffectHandler, Flow, MemorySource, Sample,
    SignalInfo, Transform, db_to_linear, scale_sample,
};
use cascade_io::{Error, Pipeline};
use cascade_registry::EffectRegistry;
use proptest::prelude::*;

const IDENTITY_COMPAND: &str = "compand 0,0 -90,-90,0,0";

fn specs(list: &[&str]) -> Vec<EffectSpec> {
    list.iter().map(|s| s.parse().unwrap()).collect()
}

fn build(
    list: &[&str],
    samples: Vec<Sample>,
    channels: usize,
    rate: u32,
    config: &PipelineConfig,
) -> Result<Pipeline<MemorySource>, Error> {
    build_with(&EffectRegistry::new(), list, samples, channels, rate, config)
}

fn build_with(
    registry: &EffectRegistry,
    list: &[&str],
    samples: Vec<Sample>,
    channels: usize,
    rate: u32,
    config: &PipelineConfig,
) -> Result<Pipeline<MemorySource>, Error> {
    Pipeline::new(
        MemorySource::new(samples, channels, rate),
        &specs(list),
        registry,
        config,
    )
}

/// Deterministic pseudo-random full-range samples.
fn noise(len: usize, seed: u32) -> Vec<Sample> {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as Sample
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Test handlers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Counters {
    starts: AtomicUsize,
    stops: AtomicUsize,
}

/// Passthrough that counts lifecycle calls and can refuse to restart.
struct Probe {
    name: &'static str,
    flags: EffectFlags,
    counters: Arc<Counters>,
    max_starts: usize,
}

impl Probe {
    fn new(name: &'static str, flags: EffectFlags) -> (Arc<Self>, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let probe = Arc::new(Self {
            name,
            flags,
            counters: Arc::clone(&counters),
            max_starts: usize::MAX,
        });
        (probe, counters)
    }
}

struct ProbeTransform {
    counters: Arc<Counters>,
    max_starts: usize,
}

impl Transform for ProbeTransform {
    fn start(&mut self, _: &SignalInfo, diagnostics: &mut Diagnostics) -> Result<(), EffectFailure> {
        let starts = self.counters.starts.fetch_add(1, Ordering::SeqCst) + 1;
        if starts > self.max_starts {
            diagnostics.error("probe: device went away");
            return Err(EffectFailure);
        }
        Ok(())
    }

    fn flow(
        &mut self,
        input: &[Sample],
        output: &mut [Sample],
        _: &mut Diagnostics,
    ) -> Result<Flow, EffectFailure> {
        let n = input.len().min(output.len());
        output[..n].copy_from_slice(&input[..n]);
        Ok(Flow::new(n, n))
    }

    fn stop(&mut self) {
        self.counters.stops.fetch_add(1, Ordering::SeqCst);
    }
}

impl EffectHandler for Probe {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "lifecycle probe"
    }
    fn flags(&self) -> EffectFlags {
        self.flags
    }
    fn create(&self, _: &[String], _: &mut Diagnostics) -> Result<Box<dyn Transform>, EffectFailure> {
        Ok(Box::new(ProbeTransform {
            counters: Arc::clone(&self.counters),
            max_starts: self.max_starts,
        }))
    }
}

#[derive(Clone, Copy)]
enum Misbehaviour {
    /// Never consumes or produces.
    Stuck,
    /// Swallows everything, produces nothing.
    Sink,
    /// Claims more input than it was given.
    Greedy,
    /// Fails mid-stream.
    Crash,
}

struct Broken(&'static str, Misbehaviour);

impl Transform for Broken {
    fn flow(
        &mut self,
        input: &[Sample],
        _output: &mut [Sample],
        diagnostics: &mut Diagnostics,
    ) -> Result<Flow, EffectFailure> {
        match self.1 {
            Misbehaviour::Stuck => Ok(Flow::new(0, 0)),
            Misbehaviour::Sink => Ok(Flow::new(input.len(), 0)),
            Misbehaviour::Greedy => Ok(Flow::new(input.len() + 1, 0)),
            Misbehaviour::Crash => {
                diagnostics.error("crash: buffer overrun in filter state");
                Err(EffectFailure)
            }
        }
    }
}

impl EffectHandler for Broken {
    fn name(&self) -> &str {
        self.0
    }
    fn description(&self) -> &str {
        "misbehaving transform"
    }
    fn flags(&self) -> EffectFlags {
        EffectFlags::MULTICHANNEL
    }
    fn create(&self, _: &[String], _: &mut Diagnostics) -> Result<Box<dyn Transform>, EffectFailure> {
        Ok(Box::new(Broken(self.0, self.1)))
    }
}

/// Restart-safe, single-channel transform that adds its running sample
/// count to every sample.
struct Ramp;

struct RampTransform {
    count: Sample,
}

impl Transform for RampTransform {
    fn start(&mut self, signal: &SignalInfo, diagnostics: &mut Diagnostics) -> Result<(), EffectFailure> {
        if signal.channels != 1 {
            diagnostics.error(format!("ramp: needs one channel, got {}", signal.channels));
            return Err(EffectFailure);
        }
        self.count = 0;
        Ok(())
    }

    fn flow(
        &mut self,
        input: &[Sample],
        output: &mut [Sample],
        _: &mut Diagnostics,
    ) -> Result<Flow, EffectFailure> {
        let n = input.len().min(output.len());
        for (out, &sample) in output[..n].iter_mut().zip(&input[..n]) {
            *out = sample.wrapping_add(self.count);
            self.count += 1;
        }
        Ok(Flow::new(n, n))
    }
}

impl EffectHandler for Ramp {
    fn name(&self) -> &str {
        "ramp"
    }
    fn description(&self) -> &str {
        "adds a running count"
    }
    fn flags(&self) -> EffectFlags {
        EffectFlags::RESTARTABLE
    }
    fn create(&self, _: &[String], _: &mut Diagnostics) -> Result<Box<dyn Transform>, EffectFailure> {
        Ok(Box::new(RampTransform { count: 0 }))
    }
}

/// Declares a shape change; never instantiated.
struct ShapeChanger(&'static str, EffectFlags);

impl EffectHandler for ShapeChanger {
    fn name(&self) -> &str {
        self.0
    }
    fn description(&self) -> &str {
        "changes the signal shape"
    }
    fn flags(&self) -> EffectFlags {
        self.1
    }
    fn create(&self, _: &[String], _: &mut Diagnostics) -> Result<Box<dyn Transform>, EffectFailure> {
        Err(EffectFailure)
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn vol_half_mono_one_second() {
    let input: Vec<Sample> = noise(7990, 1).into_iter().chain([3, -3, 5, -5, 1, -1, 0, Sample::MIN, Sample::MAX, 7]).collect();
    let mut pipeline = build(&["vol 0.5"], input.clone(), 1, 8000, &PipelineConfig::default()).unwrap();

    let out = pipeline.read(0, 8000).unwrap();
    assert_eq!(out.len(), 8000);

    let expected: Vec<Sample> = input.iter().map(|&s| (f64::from(s) * 0.5).round() as Sample).collect();
    assert_eq!(out, expected);
    assert_eq!(&out[7990..], [2, -2, 3, -3, 1, -1, 0, -(1 << 30), 1 << 30, 4]);
    assert_eq!(pipeline.next_start(), 8000);
}

#[test]
fn gain_then_compand_on_stereo_processes_lanes_independently() {
    let input = noise(2 * 300, 2);
    let config = PipelineConfig::default().with_window_frames(64);
    let mut pipeline = build(&["gain 3", IDENTITY_COMPAND], input.clone(), 2, 8000, &config).unwrap();

    let chain = pipeline.chain();
    assert!(chain.is_split());
    assert_eq!(chain.stride(), 2);
    assert_eq!(chain.len(), 4);

    let out = pipeline.read(0, 300).unwrap();
    let factor = db_to_linear(3.0);
    let expected: Vec<Sample> = input.iter().map(|&s| scale_sample(s, factor)).collect();
    assert_eq!(out, expected);
}

#[test]
fn split_chain_keeps_channel_order() {
    let frames = 100;
    let input: Vec<Sample> = (0..frames)
        .flat_map(|f| [f, 1000 + f, -f - 1])
        .collect();
    let config = PipelineConfig::default().with_window_frames(7);
    let mut pipeline = build(&[IDENTITY_COMPAND], input.clone(), 3, 44100, &config).unwrap();

    let mut out = Vec::new();
    for (i, chunk) in [13usize, 1, 50, 36].into_iter().enumerate() {
        let start = out.len() / 3;
        out.extend(pipeline.read(start as i64, chunk).unwrap());
        assert_eq!(out.len() / 3, start + chunk, "chunk {i}");
    }
    assert_eq!(out, input);
}

#[test]
fn multichannel_effects_after_split_are_replicated() {
    let config = PipelineConfig::default().with_window_frames(16);
    let pipeline = build(&[IDENTITY_COMPAND, "vol 0.5"], vec![0; 64], 2, 8000, &config).unwrap();
    assert_eq!(pipeline.chain().len(), 4);
    assert_eq!(pipeline.chain().effect_names(), ["compand", "vol"]);
    assert!(pipeline.chain().tail().iter().all(|s| s.name() == "vol"));
}

#[test]
fn delay_prepends_silence() {
    let input: Vec<Sample> = (1..=20).collect();
    let config = PipelineConfig::default().with_window_frames(4);
    let mut pipeline = build(&["delay 0.3"], input, 2, 10, &config).unwrap();

    let out = pipeline.read(0, 6).unwrap();
    assert_eq!(out, [0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn rewind_matches_fresh_pipeline() {
    let input = noise(2 * 500, 3);
    let list = ["vol 0.7", "delay 0.01", "gain -2"];
    let config = PipelineConfig::default().with_window_frames(33);

    let mut fresh = build(&list, input.clone(), 2, 1000, &config).unwrap();
    let expected = fresh.read(0, 120).unwrap();

    let mut pipeline = build(&list, input, 2, 1000, &config).unwrap();
    pipeline.read(0, 120).unwrap();
    pipeline.read(120, 250).unwrap();
    assert!(pipeline.next_start() > 0);

    assert_eq!(pipeline.read(0, 120).unwrap(), expected);
    assert_eq!(pipeline.next_start(), fresh.next_start());
    assert_eq!(pipeline.position(), 120);
}

#[test]
fn split_chain_rewind_matches_fresh_pipeline() {
    let mut registry = EffectRegistry::new();
    registry.register(Arc::new(Ramp));
    let input = noise(2 * 80, 5);
    let list = ["delay 0.3", "ramp", "vol 2"];
    let config = PipelineConfig::default().with_window_frames(7);

    let mut fresh = build_with(&registry, &list, input.clone(), 2, 10, &config).unwrap();
    assert!(fresh.chain().is_split());
    let expected = fresh.read(0, 20).unwrap();

    let mut pipeline = build_with(&registry, &list, input, 2, 10, &config).unwrap();
    pipeline.read(0, 13).unwrap();
    pipeline.read(13, 30).unwrap();

    assert_eq!(pipeline.read(0, 20).unwrap(), expected);
    assert_eq!(pipeline.next_start(), fresh.next_start());
}

#[test]
fn negative_start_also_rewinds() {
    let input: Vec<Sample> = (1..=40).collect();
    let config = PipelineConfig::default().with_window_frames(8);
    let mut pipeline = build(&["vol 1"], input, 1, 10, &config).unwrap();

    pipeline.read(0, 10).unwrap();
    assert_eq!(pipeline.read(-5, 3).unwrap(), [1, 2, 3]);
}

#[test]
fn zero_frames_is_a_no_op() {
    let config = PipelineConfig::default().with_window_frames(8);
    let mut pipeline = build(&["vol 1"], (1..=40).collect(), 1, 10, &config).unwrap();

    assert!(pipeline.read(0, 0).unwrap().is_empty());
    assert_eq!(pipeline.next_start(), 0);
    assert_eq!(pipeline.stats().passes, 0);

    pipeline.read(0, 5).unwrap();
    let (next, stats) = (pipeline.next_start(), pipeline.stats());
    // would otherwise rewind
    assert!(pipeline.read(0, 0).unwrap().is_empty());
    assert_eq!(pipeline.next_start(), next);
    assert_eq!(pipeline.stats(), stats);
    assert_eq!(pipeline.read(5, 2).unwrap(), [6, 7]);
}

#[test]
fn non_contiguous_read_continues_sequentially() {
    let config = PipelineConfig::default().with_window_frames(8);
    let mut pipeline = build(&["vol 1"], (1..=40).collect(), 1, 10, &config).unwrap();

    assert_eq!(pipeline.read(0, 3).unwrap(), [1, 2, 3]);
    assert_eq!(pipeline.read(20, 3).unwrap(), [4, 5, 6]);
}

#[test]
fn stats_respect_the_flow_contract() {
    let config = PipelineConfig::default().with_window_frames(10);
    let mut pipeline = build(&["vol 0.5", "delay 0.5", IDENTITY_COMPAND], noise(2 * 200, 4), 2, 10, &config).unwrap();
    pipeline.read(0, 150).unwrap();

    let stats = pipeline.stats();
    assert!(stats.consumed <= stats.offered);
    assert!(stats.passes > 0);
    assert!(stats.refills >= 15);
    // delay adds 5 frames of silence per lane
    assert!(stats.produced >= stats.consumed);
}

#[test]
fn pipeline_from_preset() {
    let preset = Preset::from_toml(
        r#"
name = "Half"
effects = ["vol 0.5"]

[pipeline]
window_frames = 3
"#,
    )
    .unwrap();
    let source = MemorySource::new(vec![10, 20, 30, 40, 50], 1, 8000);
    let mut pipeline = Pipeline::from_preset(source, &preset, &EffectRegistry::new()).unwrap();
    assert_eq!(pipeline.read(0, 5).unwrap(), [5, 10, 15, 20, 25]);
    assert_eq!(pipeline.next_start(), 6);
}

#[test]
fn source_can_be_borrowed() {
    let mut source = MemorySource::new(vec![2, 4, 6], 1, 8000);
    {
        let mut pipeline = Pipeline::new(
            &mut source,
            &specs(&["vol 0.5"]),
            &EffectRegistry::new(),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(pipeline.read(0, 3).unwrap(), [1, 2, 3]);
    }
    assert_eq!(source.frames(), 3);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn rewind_restarts_only_restart_safe_stages() {
    let (safe, safe_counts) = Probe::new("safe", EffectFlags::MULTICHANNEL | EffectFlags::RESTARTABLE);
    let (fragile, fragile_counts) = Probe::new("fragile", EffectFlags::MULTICHANNEL);
    let mut registry = EffectRegistry::new();
    registry.register(safe);
    registry.register(fragile);

    let config = PipelineConfig::default().with_window_frames(4);
    let mut pipeline = build_with(&registry, &["safe", "fragile"], (1..=20).collect(), 1, 10, &config).unwrap();
    assert_eq!(safe_counts.starts.load(Ordering::SeqCst), 1);
    assert_eq!(fragile_counts.starts.load(Ordering::SeqCst), 1);

    pipeline.read(0, 6).unwrap();
    assert_eq!(pipeline.read(0, 6).unwrap(), [1, 2, 3, 4, 5, 6]);

    assert_eq!(safe_counts.starts.load(Ordering::SeqCst), 2);
    assert_eq!(safe_counts.stops.load(Ordering::SeqCst), 1);
    assert_eq!(fragile_counts.starts.load(Ordering::SeqCst), 1);
    assert_eq!(fragile_counts.stops.load(Ordering::SeqCst), 0);

    drop(pipeline);
    assert_eq!(safe_counts.stops.load(Ordering::SeqCst), 2);
    assert_eq!(fragile_counts.stops.load(Ordering::SeqCst), 0);
}

#[test]
fn failed_restart_is_fatal() {
    let counters = Arc::new(Counters::default());
    let probe = Arc::new(Probe {
        name: "once",
        flags: EffectFlags::MULTICHANNEL | EffectFlags::RESTARTABLE,
        counters: Arc::clone(&counters),
        max_starts: 1,
    });
    let mut registry = EffectRegistry::new();
    registry.register(probe);

    let config = PipelineConfig::default().with_window_frames(4);
    let mut pipeline = build_with(&registry, &["vol 1", "once"], (1..=20).collect(), 1, 10, &config).unwrap();
    pipeline.read(0, 6).unwrap();

    match pipeline.read(0, 6) {
        Err(Error::Restart { name, message }) => {
            assert_eq!(name, "once");
            assert_eq!(message, "probe: device went away");
        }
        other => panic!("expected restart error, got {other:?}"),
    }
}

#[test]
fn pipeline_stays_halted_after_failed_restart() {
    let probe = Arc::new(Probe {
        name: "once",
        flags: EffectFlags::MULTICHANNEL | EffectFlags::RESTARTABLE,
        counters: Arc::new(Counters::default()),
        max_starts: 1,
    });
    let mut registry = EffectRegistry::new();
    registry.register(probe);

    let config = PipelineConfig::default().with_window_frames(4);
    let mut pipeline = build_with(&registry, &["delay 0.2", "once"], (1..=20).collect(), 1, 10, &config).unwrap();
    assert_eq!(pipeline.read(0, 6).unwrap(), [0, 0, 1, 2, 3, 4]);
    assert!(matches!(pipeline.read(0, 6), Err(Error::Restart { .. })));
    assert!(pipeline.is_halted());

    match pipeline.read(6, 6) {
        Err(Error::Halted { reason }) => assert!(reason.contains("failed to restart effect 'once'"), "{reason}"),
        other => panic!("expected halted pipeline, got {other:?}"),
    }
    assert!(matches!(pipeline.read(0, 6), Err(Error::Halted { .. })));
}

#[test]
fn failed_start_at_build_stops_only_started_stages() {
    let (safe, safe_counts) = Probe::new("safe", EffectFlags::MULTICHANNEL | EffectFlags::RESTARTABLE);
    let broken_counts = Arc::new(Counters::default());
    let broken = Arc::new(Probe {
        name: "broken",
        flags: EffectFlags::MULTICHANNEL | EffectFlags::RESTARTABLE,
        counters: Arc::clone(&broken_counts),
        max_starts: 0,
    });
    let mut registry = EffectRegistry::new();
    registry.register(safe);
    registry.register(broken);

    let err = build_with(&registry, &["safe", "broken"], vec![0; 8], 1, 10, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Configuration { ref name, .. } if name == "broken"));

    assert_eq!(safe_counts.starts.load(Ordering::SeqCst), 1);
    assert_eq!(safe_counts.stops.load(Ordering::SeqCst), 1);
    assert_eq!(broken_counts.starts.load(Ordering::SeqCst), 1);
    assert_eq!(broken_counts.stops.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn construction_errors() {
    let config = PipelineConfig::default();

    let err = build(&["vol 0.5", "flanger 0.3"], vec![0; 4], 1, 8000, &config).unwrap_err();
    assert!(matches!(err, Error::UnknownEffect { ref name } if name == "flanger"));
    assert_eq!(err.to_string(), "unknown effect 'flanger'");

    let err = build(&["delay soon"], vec![0; 4], 1, 8000, &config).unwrap_err();
    assert!(matches!(err, Error::Configuration { ref name, .. } if name == "delay"));
    assert!(err.to_string().contains("soon"), "{err}");

    let err = build(&["compand 0.1"], vec![0; 4], 1, 8000, &config).unwrap_err();
    assert!(err.to_string().contains("usage: compand"), "{err}");

    assert!(matches!(build(&[], vec![0; 4], 1, 8000, &config), Err(Error::EmptyChain)));

    let bad = PipelineConfig::default().with_window_frames(0);
    assert!(matches!(build(&["vol 1"], vec![0; 4], 1, 8000, &bad), Err(Error::Config(_))));
}

#[test]
fn shape_changing_effects_are_rejected() {
    let mut registry = EffectRegistry::new();
    registry.register(Arc::new(ShapeChanger("rate", EffectFlags::MULTICHANNEL | EffectFlags::CHANGES_RATE)));
    registry.register(Arc::new(ShapeChanger("remix", EffectFlags::MULTICHANNEL | EffectFlags::CHANGES_CHANNELS)));
    let config = PipelineConfig::default();

    for (name, reason) in [("rate", "sample rate"), ("remix", "number of channels")] {
        let err = build_with(&registry, &["vol 1", name], vec![0; 4], 2, 8000, &config).unwrap_err();
        match err {
            Error::UnsupportedEffect { name: got, reason: why } => {
                assert_eq!(got, name);
                assert!(why.contains(reason), "{why}");
            }
            other => panic!("expected unsupported effect, got {other}"),
        }
    }
}

#[test]
fn stuck_transform_is_detected() {
    let mut registry = EffectRegistry::new();
    registry.register(Arc::new(Broken("stuck", Misbehaviour::Stuck)));
    let config = PipelineConfig::default().with_window_frames(4);
    let mut pipeline = build_with(&registry, &["vol 1", "stuck"], vec![1; 16], 1, 10, &config).unwrap();

    // first pass: vol moves the window; second pass: nothing moves
    assert!(matches!(pipeline.read(0, 4), Err(Error::Stalled { passes: 2 })));
}

#[test]
fn silent_chain_hits_idle_bound() {
    let mut registry = EffectRegistry::new();
    registry.register(Arc::new(Broken("sink", Misbehaviour::Sink)));
    let config = PipelineConfig::default()
        .with_window_frames(4)
        .with_max_idle_passes(8);
    let mut pipeline = build_with(&registry, &["sink"], vec![1; 16], 1, 10, &config).unwrap();

    assert!(matches!(pipeline.read(0, 4), Err(Error::Stalled { passes: 9 })));
    assert_eq!(pipeline.stats().passes, 9);
}

#[test]
fn contract_violation_is_reported() {
    let mut registry = EffectRegistry::new();
    registry.register(Arc::new(Broken("greedy", Misbehaviour::Greedy)));
    let config = PipelineConfig::default().with_window_frames(4);
    let mut pipeline = build_with(&registry, &["greedy"], vec![1; 16], 1, 10, &config).unwrap();

    match pipeline.read(0, 4) {
        Err(Error::Flow { name, message }) => {
            assert_eq!(name, "greedy");
            assert!(message.contains("only 4 were offered"), "{message}");
        }
        other => panic!("expected flow error, got {other:?}"),
    }
}

#[test]
fn transform_failure_carries_its_diagnostic() {
    let mut registry = EffectRegistry::new();
    registry.register(Arc::new(Broken("crash", Misbehaviour::Crash)));
    let config = PipelineConfig::default().with_window_frames(4);
    let mut pipeline = build_with(&registry, &["crash"], vec![1; 16], 1, 10, &config).unwrap();

    let err = pipeline.read(0, 4).unwrap_err();
    assert_eq!(
        err.to_string(),
        "effect 'crash' failed: crash: buffer overrun in filter state"
    );

    // no retry after a mid-stream failure, not even from the start
    assert!(matches!(pipeline.read(4, 4), Err(Error::Halted { .. })));
    assert!(matches!(pipeline.read(0, 4), Err(Error::Halted { .. })));
}

#[test]
fn oversized_window_is_rejected() {
    let config = PipelineConfig::default().with_window_frames(usize::MAX);
    assert!(matches!(build(&["vol 1"], vec![0; 4], 1, 8000, &config), Err(Error::Config(_))));
}

// ---------------------------------------------------------------------------
// Chunked reads
// ---------------------------------------------------------------------------

const CHAINS: &[&[&str]] = &[
    &["vol 0.5"],
    &["gain -3", "delay 0.3"],
    &[IDENTITY_COMPAND, "vol 2"],
    &["delay 0.2", "compand 0.1,0.2 -70,-60,-20,-10,0,-3 2"],
    &["vol -6dB", "compand 0.05,0.3 -60,-40,0,-6", "delay 0.1"],
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chunked_reads_equal_one_covering_read(
        chain in 0..CHAINS.len(),
        channels in 1usize..=3,
        window in 1usize..24,
        seed in any::<u32>(),
        chunks in prop::collection::vec(1usize..17, 1..12),
    ) {
        let total: usize = chunks.iter().sum();
        let input = noise(channels * (total / 2 + 1), seed);
        let config = PipelineConfig::default().with_window_frames(window);

        let mut whole = build(CHAINS[chain], input.clone(), channels, 10, &config).unwrap();
        let expected = whole.read(0, total).unwrap();
        prop_assert_eq!(expected.len(), total * channels);

        let mut chunked = build(CHAINS[chain], input, channels, 10, &config).unwrap();
        let mut collected = Vec::with_capacity(expected.len());
        let mut start = 0usize;
        for &frames in &chunks {
            let block = chunked.read(start as i64, frames).unwrap();
            prop_assert_eq!(block.len(), frames * channels);
            collected.extend(block);
            start += frames;
        }
        prop_assert_eq!(collected, expected);

        let stats = chunked.stats();
        prop_assert!(stats.consumed <= stats.offered);
    }
}
