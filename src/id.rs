use serde::{Deserialize, Serialize};

/// One of the two storage designs under comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Variant {
    Controller,
    Checkpoint,
}

/// How an experiment family encodes its parameters in a benchmark id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamStyle {
    /// Single decimal digits appended to the group tag, one parameter per
    /// digit, e.g. `recover631` decodes to `[6, 3, 1]`.
    PackedDigits { count: usize },
    /// Underscore-separated integers after the group tag, e.g.
    /// `drecover_56_2_1` decodes to `[56, 2, 1]`.
    Underscored { count: usize },
    /// The group segment is the bare tag and the single parameter is the
    /// integer suffix of the function name, e.g. `read/single_1048576`
    /// decodes to `[1048576]`.
    VariantSuffix,
}

/// Declarative description of one experiment family: the group tag, the
/// parameter encoding and the function names that identify each variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSchema {
    tag: String,
    style: ParamStyle,
    variants: Vec<(String, Variant)>,
}

/// Decoding result: the variant a record belongs to and its parameters, in
/// the order the id encodes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedKey {
    pub variant: Variant,
    pub params: Vec<u64>,
}

impl ExperimentSchema {
    pub fn new(
        tag: impl Into<String>,
        style: ParamStyle,
        variants: Vec<(String, Variant)>,
    ) -> Self {
        Self {
            tag: tag.into(),
            style,
            variants,
        }
    }

    /// Retrieves the number of parameters this schema decodes per id.
    pub fn param_count(&self) -> usize {
        match self.style {
            ParamStyle::PackedDigits { count } => count,
            ParamStyle::Underscored { count } => count,
            ParamStyle::VariantSuffix => 1,
        }
    }

    /// Decodes a benchmark id, returning `None` when the id belongs to a
    /// different experiment family or to an unknown variant. Logs hold
    /// several interleaved families, so a `None` is normal and the record
    /// is simply skipped upstream of grouping.
    pub fn decode(&self, id: &str) -> Option<DecodedKey> {
        let (group, function) = id.split_once('/')?;
        let mut params = self.group_params(group)?;

        for (tag, variant) in &self.variants {
            match self.style {
                ParamStyle::VariantSuffix => {
                    // the function name carries the parameter: `<tag>_<int>`
                    let rest = match function.strip_prefix(tag.as_str()) {
                        Some(rest) => rest,
                        None => continue,
                    };
                    let suffix = match rest.strip_prefix('_') {
                        Some(suffix) => suffix,
                        None => continue,
                    };
                    if let Ok(value) = suffix.parse() {
                        params.push(value);
                        return Some(DecodedKey {
                            variant: *variant,
                            params,
                        });
                    }
                }
                _ => {
                    // an exact entry doubles as an equality filter, e.g.
                    // `single_31509708` selects a single file size
                    if function == tag {
                        return Some(DecodedKey {
                            variant: *variant,
                            params,
                        });
                    }
                }
            }
        }
        None
    }

    // Decodes the parameters encoded in the group segment, or `None` when
    // the segment does not follow this schema's layout.
    fn group_params(&self, group: &str) -> Option<Vec<u64>> {
        let rest = group.strip_prefix(self.tag.as_str())?;
        match self.style {
            ParamStyle::PackedDigits { count } => {
                if rest.len() != count || !rest.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                Some(rest.bytes().map(|b| u64::from(b - b'0')).collect())
            }
            ParamStyle::Underscored { count } => {
                let parts: Vec<_> = rest.split('_').collect();
                // `_56_2` splits into an empty head plus one part per value
                if parts.len() != count + 1 || !parts[0].is_empty() {
                    return None;
                }
                parts[1..].iter().map(|part| part.parse().ok()).collect()
            }
            ParamStyle::VariantSuffix => {
                if rest.is_empty() {
                    Some(Vec::new())
                } else {
                    None
                }
            }
        }
    }
}
