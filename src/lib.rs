//! # Wafer
//!
//! Builds Finnish wiki album articles from catalog metadata, published
//! reviews and the artist's discography.
//!
//! A build fetches the release and its tracks from the music catalog, turns
//! each review URL into a rating line plus a reference, finds the previous
//! and next album in the artist's listing, and renders the article.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌────────────┐
//! │ Review URLs │──▶│ ReviewEngine │──▶│ Citations  │──┐
//! └─────────────┘   │ Source rules │   └────────────┘  │
//!                   └──────────────┘                   ▼
//! ┌─────────────┐   ┌──────────────┐   ┌────────────┐ ┌──────────┐
//! │   Catalog   │──▶│ Discography  │──▶│ Neighbors  │▶│ Document │
//! │  (OAuth2)   │   │   listing    │   └────────────┘ └──────────┘
//! └─────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! wafer sources                                   # supported review sites
//! wafer review https://kaaoszine.fi/...           # cite one review
//! wafer neighbors 102314585                       # previous / next album
//! wafer build 102314585 --review https://...      # write the article
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Error taxonomy |
//! | [`traits`] | `ReviewSource`, `CatalogApi`, `TokenProvider` |
//! | [`sources`] | Review source registry |
//! | [`extract`] | HTML extraction helpers shared by sources |
//! | [`rating`] | Rating normalization |
//! | [`citation`] | Rating line and reference markup |
//! | [`review`] | Review extraction engine |
//! | [`fetch`] | Page fetching and retries |
//! | [`auth`] | Catalog access tokens |
//! | [`catalog`] | Catalog HTTP client |
//! | [`discography`] | Listing and neighbor resolution |
//! | [`document`] | Article rendering |
//! | [`generate`] | End-to-end build |

pub mod auth;
pub mod catalog;
pub mod citation;
pub mod config;
pub mod discography;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod generate;
pub mod models;
pub mod rating;
pub mod review;
pub mod source_blabbermouth;
pub mod source_kaaoszine;
pub mod source_metalinjection;
pub mod source_metalliluola;
pub mod source_metalsucks;
pub mod source_soundi;
pub mod sources;
pub mod traits;
