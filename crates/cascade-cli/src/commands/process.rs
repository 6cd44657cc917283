//! File-based effect processing command.

use anyhow::Context;
use cascade_config::{EffectSpec, Preset};
use cascade_core::{MemorySource, Sample, linear_to_db};
use cascade_io::{Pipeline, WavSpec, read_wav, write_wav};
use cascade_registry::EffectRegistry;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Effect to append to the chain, e.g. "vol -6dB" (repeatable)
    #[arg(short, long = "effect", value_name = "SPEC")]
    effects: Vec<String>,

    /// Preset file (TOML); --effect entries are appended to its chain
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Frames requested from the pipeline per read
    #[arg(long, default_value = "4096")]
    block_frames: usize,

    /// Frames pulled from the input per refill (default: one second)
    #[arg(long)]
    window_frames: Option<usize>,

    /// Passes without output before giving up
    #[arg(long)]
    max_idle_passes: Option<usize>,

    /// Output bit depth (8, 16, 24 or 32; default: same as input)
    #[arg(long)]
    bit_depth: Option<u16>,

    /// Save the effective chain and settings as a preset
    #[arg(long, value_name = "FILE")]
    save_preset: Option<PathBuf>,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_frames == 0 {
        anyhow::bail!("--block-frames must be at least 1");
    }

    let preset = build_preset(&args)?;
    if preset.is_empty() {
        anyhow::bail!("No effect specified. Use --effect or --preset");
    }

    println!("Reading {}...", args.input.display());
    let (samples, spec) = read_wav(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let channels = usize::from(spec.channels);
    let frames = samples.len() / channels.max(1);
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        spec.channels,
        spec.sample_rate,
        frames as f64 / f64::from(spec.sample_rate.max(1))
    );
    let input_peak = peak_db(&samples);

    let source = MemorySource::new(samples, channels, spec.sample_rate);
    let registry = EffectRegistry::new();
    let mut pipeline = Pipeline::from_preset(source, &preset, &registry)?;

    println!(
        "Processing with {} effect(s){}...",
        pipeline.chain().effect_count(),
        if pipeline.chain().is_split() {
            ", one lane per channel"
        } else {
            ""
        }
    );

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut output: Vec<Sample> = vec![0; frames * channels];
    let mut start = 0;
    for block in output.chunks_mut(args.block_frames * channels) {
        pipeline.read_into(start as i64, block)?;
        start += block.len() / channels;
        pb.set_position(start as u64);
    }
    pb.finish_with_message("done");

    let stats = pipeline.stats();
    tracing::debug!(?stats, "pipeline finished");

    println!("\nStats:");
    println!("  Input peak:  {:.1} dBFS", input_peak);
    println!("  Output peak: {:.1} dBFS", peak_db(&output));
    println!("  Passes: {}, source refills: {}", stats.passes, stats.refills);

    let out_spec = WavSpec {
        bits_per_sample: args.bit_depth.unwrap_or(spec.bits_per_sample),
        ..spec
    };
    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, out_spec)?;

    if let Some(path) = &args.save_preset {
        preset.save(path)?;
        println!("Saved preset to {}", path.display());
    }

    println!("Done!");
    Ok(())
}

fn build_preset(args: &ProcessArgs) -> anyhow::Result<Preset> {
    let mut preset = match &args.preset {
        Some(path) => {
            let preset = Preset::load(path)?;
            println!("Loading preset: {}", preset.name);
            preset
        }
        None => Preset::new("Command line"),
    };

    for spec in &args.effects {
        let spec: EffectSpec = spec
            .parse()
            .with_context(|| format!("invalid effect spec '{spec}'"))?;
        preset.effects.push(spec);
    }
    if let Some(frames) = args.window_frames {
        preset.pipeline.window_frames = Some(frames);
    }
    if let Some(passes) = args.max_idle_passes {
        preset.pipeline.max_idle_passes = passes;
    }
    preset.pipeline.validate()?;
    Ok(preset)
}

fn peak_db(samples: &[Sample]) -> f64 {
    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
    let db = linear_to_db(f64::from(peak) / 2_147_483_648.0);
    db.max(-120.0)
}
