//! Match Engine Module
//!
//! This module contains the core components of the sticker matching system:
//! - `data`: need/duplicate partition of a collection
//! - `entry`: albums, stickers, users, collection entries, proposals and match records
//! - `matchengine`: potential-match search and match recording over the stores
//! - `matchlogic`: exchange discovery between two partitions

pub mod data;
pub mod entry;
pub mod matchengine;
pub mod matchlogic;
