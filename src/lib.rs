#![forbid(unsafe_code)]

pub mod align;
pub mod assemble;
pub mod build;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod export;
pub mod formats;
pub mod images;
pub mod logging;
pub mod pipeline;
pub mod sentiment;
pub mod sheet;
pub mod source;
pub mod split;
pub mod text;
pub mod tracks;
