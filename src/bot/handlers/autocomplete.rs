//! Autocomplete handlers for Discord slash command parameters.
//!
//! Track parameters suggest search results as the user types. Input that is
//! already a playable link is offered back unchanged, without searching.

use crate::{
    bot::{BotData, best_effort::BestEffort},
    core::{max_length, search},
    errors::Error,
};
use poise::serenity_prelude::AutocompleteChoice;
use rand::seq::SliceRandom;

/// Provides autocomplete suggestions for a track search.
///
/// Empty input searches one of the configured seed queries so the list is never
/// blank. Results respect the user's duration cap. Any failure yields no
/// suggestions.
pub async fn autocomplete_track(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<AutocompleteChoice> {
    let data = ctx.data();
    let input = partial.trim();

    if data.direct_links.is_direct_link(input) {
        if let Some((name, value)) = search::direct_link_choice(input) {
            return vec![AutocompleteChoice::new(name, value)];
        }
    }

    let query = if input.is_empty() {
        let seeds = &data.config.player.autocomplete_search;
        let Some(seed) = seeds.choose(&mut rand::thread_rng()).cloned() else {
            return Vec::new();
        };
        seed
    } else {
        input.to_string()
    };

    let author = ctx.author().id;
    let max_ms = max_length::get_max_length(&data.database, &author.to_string())
        .await
        .best_effort("read max length")
        .flatten();

    let Some(result) = search::search_tracks(data.lavalink.as_ref(), &query, Some(author), max_ms)
        .await
        .best_effort("autocomplete search")
    else {
        return Vec::new();
    };

    search::autocomplete_choices(&result.tracks, &query)
        .into_iter()
        .map(|(name, value)| AutocompleteChoice::new(name, value))
        .collect()
}
