//! Shared fixtures for the CLI integration tests.
//!
//! - [`run_cli`] calls `draftsim_cli::run` in-process and captures both streams.
//! - [`write_catalog`] writes a Scryfall-style search page with a balanced
//!   `tst` set plus a few cards from another set.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

pub const SET: &str = "tst";

#[derive(Debug)]
pub struct CliOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn run_cli(args: &[&str]) -> CliOutput {
    let mut argv = vec!["draftsim"];
    argv.extend_from_slice(args);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = draftsim_cli::run(argv, &mut out, &mut err);
    CliOutput {
        code,
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
    }
}

const TYPES: [&str; 5] = [
    "Creature — Soldier",
    "Instant",
    "Creature — Beast",
    "Sorcery",
    "Enchantment — Aura",
];

fn rarity_for(i: usize) -> &'static str {
    match i % 10 {
        0..=5 => "common",
        6 | 7 => "uncommon",
        8 => "rare",
        _ => "mythic",
    }
}

fn card(id: String, colors: &[&str], cmc: f64, type_line: &str, rarity: &str, set: &str) -> Value {
    json!({
        "object": "card",
        "id": id,
        "name": format!("Card {id}"),
        "cmc": cmc,
        "color_identity": colors,
        "type_line": type_line,
        "rarity": rarity,
        "set": set,
    })
}

pub fn catalog_cards() -> Vec<Value> {
    let mut cards = Vec::new();
    for color in ["W", "U", "B", "R", "G"] {
        for i in 0..40 {
            cards.push(card(
                format!("{color}{i:02}"),
                &[color],
                (i % 6) as f64 + 1.0,
                TYPES[i % TYPES.len()],
                rarity_for(i),
                SET,
            ));
        }
    }
    for i in 0..20 {
        cards.push(card(
            format!("A{i:02}"),
            &[],
            (i % 5) as f64 + 1.0,
            "Artifact Creature — Golem",
            rarity_for(i),
            SET,
        ));
    }
    for i in 0..6 {
        cards.push(card(format!("L{i:02}"), &[], 0.0, "Land", "common", SET));
    }
    for (symbol, name) in [("W", "Plains"), ("U", "Island")] {
        cards.push(json!({
            "id": format!("basic-{symbol}"),
            "name": name,
            "cmc": 0.0,
            "color_identity": [symbol],
            "type_line": format!("Basic Land — {name}"),
            "rarity": "common",
            "set": SET,
        }));
    }
    for i in 0..5 {
        cards.push(card(format!("X{i:02}"), &["R"], 2.0, "Instant", "common", "xyz"));
    }
    cards
}

/// Writes the fixture catalog as a search page and returns its path.
pub fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("catalog.json");
    let page = json!({ "object": "list", "has_more": false, "data": catalog_cards() });
    std::fs::write(&path, serde_json::to_string(&page).unwrap()).unwrap();
    path
}

/// A catalog where only three cards are white-blue; a WU deck can never be built.
pub fn write_starved_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("starved.json");
    let mut cards = Vec::new();
    for i in 0..3 {
        cards.push(card(format!("on{i}"), &["W", "U"], 2.0, "Creature — Bird", "common", SET));
    }
    for i in 0..97 {
        cards.push(card(format!("off{i}"), &["B"], 2.0, "Creature — Zombie", "common", SET));
    }
    std::fs::write(&path, serde_json::to_string(&cards).unwrap()).unwrap();
    path
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}
