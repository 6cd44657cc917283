//! Effect listing and information command.

use cascade_core::EffectFlags;
use cascade_registry::{EffectDescriptor, EffectRegistry};
use clap::Args;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for a specific effect
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,
}

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    let registry = EffectRegistry::new();

    if let Some(name) = &args.effect {
        let effect = registry
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown effect: {}", name))?;
        print_details(&effect);
        return Ok(());
    }

    println!("Available Effects");
    println!("=================");
    println!();
    println!("  {:10}  {:14}  {}", "Name", "Channels", "Description");
    println!("  {:10}  {:14}  {}", "----", "--------", "-----------");
    for effect in registry.all_effects() {
        println!(
            "  {:10}  {:14}  {}",
            effect.name,
            channel_mode(effect.flags),
            effect.description
        );
    }
    println!();
    println!("Use 'cascade effects <EFFECT>' for argument details.");
    Ok(())
}

fn print_details(effect: &EffectDescriptor) {
    println!("{}", effect.name);
    println!("{}", "=".repeat(effect.name.len()));
    println!();
    println!("{}", effect.description);
    println!();
    println!("Usage:     {} {}", effect.name, effect.usage);
    println!("Channels:  {}", channel_mode(effect.flags));
    println!(
        "Restart:   {}",
        if effect.flags.contains(EffectFlags::RESTARTABLE) {
            "restarted on rewind"
        } else {
            "keeps its state on rewind"
        }
    );
    println!();
    println!("Example usage:");
    println!();
    println!(
        "  cascade process input.wav output.wav --effect \"{} {}\"",
        effect.name, effect.usage
    );
}

fn channel_mode(flags: EffectFlags) -> &'static str {
    if flags.contains(EffectFlags::MULTICHANNEL) {
        "interleaved"
    } else {
        "one per channel"
    }
}
