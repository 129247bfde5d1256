//! Column names shared by the training data and the fitted artifacts.
//!
//! Names must match the training frame exactly; fitted scalers and
//! classifiers refer to columns by these strings.

pub const NITROGEN: &str = "Nitrogen";
pub const PHOSPHORUS: &str = "Phosphorus";
pub const POTASSIUM: &str = "Potassium";
pub const TEMPERATURE: &str = "Temperature";
pub const HUMIDITY: &str = "Humidity";
pub const PH_VALUE: &str = "pH_Value";
pub const RAINFALL: &str = "Rainfall";

pub const NP_RATIO: &str = "NP_Ratio";
pub const NK_RATIO: &str = "NK_Ratio";
pub const PK_RATIO: &str = "PK_Ratio";
pub const NPK_AVERAGE: &str = "NPK_Average";
pub const TEMP_HUMIDITY_INDEX: &str = "Temp_Humidity_Index";
pub const RAINFALL_HUMIDITY_INDEX: &str = "Rainfall_Humidity_Index";
pub const PH_CATEGORY: &str = "PH_Cat";

pub const LOG_PREFIX: &str = "Log_";
pub const SQRT_PREFIX: &str = "SQ_";
pub const POWER_PREFIX: &str = "PT_";

/// Raw input columns in collection order.
pub const RAW_COLUMNS: [&str; 7] = [
    NITROGEN,
    PHOSPHORUS,
    POTASSIUM,
    TEMPERATURE,
    HUMIDITY,
    PH_VALUE,
    RAINFALL,
];

/// Columns of an encoded sample, in frame order.
pub const ENCODED_COLUMNS: [&str; 14] = [
    NITROGEN,
    PHOSPHORUS,
    POTASSIUM,
    TEMPERATURE,
    HUMIDITY,
    PH_VALUE,
    RAINFALL,
    NP_RATIO,
    NK_RATIO,
    PK_RATIO,
    NPK_AVERAGE,
    TEMP_HUMIDITY_INDEX,
    RAINFALL_HUMIDITY_INDEX,
    PH_CATEGORY,
];

/// Columns the deployed model log-transforms.
pub const DEFAULT_LOG_COLUMNS: [&str; 7] = [
    PHOSPHORUS,
    HUMIDITY,
    RAINFALL,
    NK_RATIO,
    PK_RATIO,
    NPK_AVERAGE,
    RAINFALL_HUMIDITY_INDEX,
];

/// Columns the deployed model square-root transforms.
pub const DEFAULT_SQRT_COLUMNS: [&str; 1] = [NITROGEN];

/// Columns the deployed model power transforms.
pub const DEFAULT_POWER_COLUMNS: [&str; 2] = [POTASSIUM, NP_RATIO];

/// Ordered feature names the classifier consumes when its artifact does not
/// list them itself.
pub const DEFAULT_MODEL_FEATURES: [&str; 10] = [
    "Temperature",
    "pH_Value",
    "Temp_Humidity_Index",
    "Log_Phosphorus",
    "Log_Humidity",
    "Log_Rainfall",
    "Log_NK_Ratio",
    "Log_PK_Ratio",
    "SQ_Nitrogen",
    "PT_Potassium",
];

/// Owned copies of a static column list.
pub fn to_owned_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Names in `expected` but not in `got`, and in `got` but not in `expected`.
pub(crate) fn column_diff(expected: &[String], got: &[String]) -> (Vec<String>, Vec<String>) {
    let missing = expected
        .iter()
        .filter(|name| !got.contains(name))
        .cloned()
        .collect();
    let unexpected = got
        .iter()
        .filter(|name| !expected.contains(name))
        .cloned()
        .collect();
    (missing, unexpected)
}

/// Every name that appears again after its first occurrence.
pub(crate) fn repeated_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .enumerate()
        .filter(|(i, name)| names[..*i].contains(name))
        .map(|(_, name)| name.clone())
        .collect()
}
