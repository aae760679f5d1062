//! Preset listing

use anyhow::Result;
use colored::Colorize;
use gba_input_maps::{GcButton, KeyMap, MAPPABLE_KEYS, N64Button, TargetButton};
use joybus_responder::Target;
use serde_json::{Value, json};

use crate::commands::TargetArg;
use crate::output;

/// `A=A B=B STA=START ...`, with `-` for unmapped slots.
fn describe<T: TargetButton>(keymap: &KeyMap) -> String {
    MAPPABLE_KEYS
        .iter()
        .map(|key| {
            let target = keymap.target_for::<T>(*key).map_or("-", |b| b.name());
            format!("{}={}", key.echo_label(), target)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn presets_json<T: TargetButton>() -> Value {
    let presets: Vec<Value> = T::PRESETS
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "menu_key": p.menu_key.name(),
                "slots": p.keymap.slots,
                "mirror_vertical_dpad": p.keymap.mirror_vertical_dpad,
            })
        })
        .collect();
    json!({ "target": T::PERSONALITY, "presets": presets })
}

fn print_presets<T: TargetButton>(title: &str) {
    println!("{}", title.bold());
    for preset in T::PRESETS {
        println!(
            "  {} {} ({}) [menu: {}]",
            "●".green(),
            preset.name.bold(),
            preset.id.dimmed(),
            preset.menu_key
        );
        println!("    {}", describe::<T>(&preset.keymap));
        if preset.keymap.mirror_vertical_dpad {
            println!("    d-pad up/down also press digital UP/DOWN");
        }
    }
    println!("  {} Custom profile ({}) [menu: SELECT]", "●".yellow(), "custom".dimmed());
}

/// List built-in presets for one or both personalities.
pub fn execute(target: Option<TargetArg>, json: bool) -> Result<()> {
    let target = target.map(Target::from);
    let n64 = target.is_none_or(|t| t == Target::N64);
    let gamecube = target.is_none_or(|t| t == Target::GameCube);

    if json {
        let mut targets = Vec::new();
        if n64 {
            targets.push(presets_json::<N64Button>());
        }
        if gamecube {
            targets.push(presets_json::<GcButton>());
        }
        output::print_json(&json!({ "success": true, "targets": targets }));
        return Ok(());
    }

    if n64 {
        print_presets::<N64Button>("N64 profiles:");
    }
    if gamecube {
        print_presets::<GcButton>("GameCube profiles:");
    }
    Ok(())
}
