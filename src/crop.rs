//! The closed vocabulary of crops the classifier can recommend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

/// A recommendable crop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Crop {
    Rice,
    Maize,
    Jute,
    Cotton,
    Coconut,
    Papaya,
    Orange,
    Apple,
    Muskmelon,
    Watermelon,
    Grapes,
    Mango,
    Banana,
    Pomegranate,
    Lentil,
    Blackgram,
    MungBean,
    MothBeans,
    PigeonPeas,
    KidneyBeans,
    ChickPea,
    Coffee,
}

impl Crop {
    pub const ALL: [Crop; 22] = [
        Crop::Rice,
        Crop::Maize,
        Crop::Jute,
        Crop::Cotton,
        Crop::Coconut,
        Crop::Papaya,
        Crop::Orange,
        Crop::Apple,
        Crop::Muskmelon,
        Crop::Watermelon,
        Crop::Grapes,
        Crop::Mango,
        Crop::Banana,
        Crop::Pomegranate,
        Crop::Lentil,
        Crop::Blackgram,
        Crop::MungBean,
        Crop::MothBeans,
        Crop::PigeonPeas,
        Crop::KidneyBeans,
        Crop::ChickPea,
        Crop::Coffee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Rice => "Rice",
            Crop::Maize => "Maize",
            Crop::Jute => "Jute",
            Crop::Cotton => "Cotton",
            Crop::Coconut => "Coconut",
            Crop::Papaya => "Papaya",
            Crop::Orange => "Orange",
            Crop::Apple => "Apple",
            Crop::Muskmelon => "Muskmelon",
            Crop::Watermelon => "Watermelon",
            Crop::Grapes => "Grapes",
            Crop::Mango => "Mango",
            Crop::Banana => "Banana",
            Crop::Pomegranate => "Pomegranate",
            Crop::Lentil => "Lentil",
            Crop::Blackgram => "Blackgram",
            Crop::MungBean => "MungBean",
            Crop::MothBeans => "MothBeans",
            Crop::PigeonPeas => "PigeonPeas",
            Crop::KidneyBeans => "KidneyBeans",
            Crop::ChickPea => "ChickPea",
            Crop::Coffee => "Coffee",
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Crop {
    type Err = PipelineError;

    /// Case-insensitive; spaces and underscores are ignored ("mung bean").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect();
        Crop::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| PipelineError::UnknownCategory(format!("crop '{}'", s)))
    }
}
