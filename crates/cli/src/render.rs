//! # Render
//!
//! Plain-text views of lookup results and favorites.

use pokedex_core::catalog::{CatalogItem, CatalogRef};
use pokedex_core::state::FavoriteEntry;

/// `pikachu` -> `Pikachu`
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Detail view for a single lookup
pub fn item(item: &CatalogItem, favorite: bool) -> String {
    let heart = if favorite { "♥" } else { "♡" };
    let mut lines = vec![format!("{} {}", heart, display_name(&item.name))];

    if !item.sprite_url.is_empty() {
        lines.push(format!("  Artwork:   {}", item.sprite_url));
    }
    lines.push(format!("  Types:     {}", item.types.join(", ")));
    lines.push(format!("  Abilities: {}", item.abilities.join(", ")));
    lines.push("  Stats:".to_string());
    lines.extend(
        item.stats
            .iter()
            .map(|stat| format!("    {}: {}", stat.name, stat.value)),
    );
    lines.push(format!("  Height:    {}m", item.height_meters()));
    lines.push(format!("  Weight:    {}kg", item.weight_kilograms()));

    if !item.variants.is_empty() {
        lines.push(format!("  Forms:     {}", names(&item.variants).join(", ")));
    }

    block(lines)
}

/// Favorites screen
pub fn favorites(entries: &[FavoriteEntry]) -> String {
    if entries.is_empty() {
        return "No favorites yet.\n".to_string();
    }

    block(entries.iter().map(|entry| {
        format!(
            "♥ {:<16} {}",
            display_name(&entry.name),
            entry.types.join(", ")
        )
    }))
}

/// One name per line, or a placeholder when empty
pub fn refs(refs: &[CatalogRef], empty: &str) -> String {
    if refs.is_empty() {
        return format!("{}\n", empty);
    }

    block(refs.iter().map(|r| format!("  {}", r.name)))
}

/// Newline-terminated lines
fn block(lines: impl IntoIterator<Item = String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

fn names(refs: &[CatalogRef]) -> Vec<&str> {
    refs.iter().map(|r| r.name.as_str()).collect()
}
