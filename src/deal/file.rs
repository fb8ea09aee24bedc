//! Deal files: one strategy-tagged JSON object, or an array of them

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::inputs::StrategyInputs;
use crate::error::LoadError;

#[derive(Deserialize)]
#[serde(untagged)]
enum DealFile {
    Many(Vec<StrategyInputs>),
    One(Box<StrategyInputs>),
}

/// Read deals from any reader; a single object yields one deal
pub fn load_deals_from_reader<R: Read>(reader: R) -> Result<Vec<StrategyInputs>, LoadError> {
    let deals = match serde_json::from_reader(reader)? {
        DealFile::Many(deals) => deals,
        DealFile::One(deal) => vec![*deal],
    };
    Ok(deals)
}

pub fn load_deals<P: AsRef<Path>>(path: P) -> Result<Vec<StrategyInputs>, LoadError> {
    let file = File::open(path)?;
    load_deals_from_reader(BufReader::new(file))
}
