use crate::id::ExperimentSchema;
use crate::series::SparsePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Chart corner where the legend box is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendCorner {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

/// Secondary parameter that splits one chart into several series pairs:
/// which decoded parameter it is, the values to draw and their order, and
/// the noun used in legend labels (e.g. `failures` gives
/// `"controller, 2 failures"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetSpec {
    param: usize,
    values: Vec<u64>,
    noun: String,
}

impl FacetSpec {
    pub fn new(param: usize, values: Vec<u64>, noun: impl Into<String>) -> Self {
        Self {
            param,
            values,
            noun: noun.into(),
        }
    }

    pub fn param(&self) -> usize {
        self.param
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn noun(&self) -> &str {
        &self.noun
    }
}

/// Everything that defines one chart: where the measurements come from,
/// how ids decode, what varies on the x axis, how units convert, and how
/// the artifact is drawn and where it goes. Scale, axis labels and output
/// path travel together so mismatched units cannot slip in silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    log_file: PathBuf,
    schema: ExperimentSchema,
    x_param: usize,
    scale: f64,
    x_label: String,
    y_label: String,
    output_path: PathBuf,
    facet: Option<FacetSpec>,
    palette: Vec<(String, String)>,
    sparse: SparsePolicy,
    width: u32,
    height: u32,
    legend: LegendCorner,
}

impl ChartSpec {
    pub fn new(
        log_file: impl Into<PathBuf>,
        schema: ExperimentSchema,
        x_param: usize,
        scale: f64,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        assert!(
            x_param < schema.param_count(),
            "x parameter index {} out of range for a schema with {} parameters",
            x_param,
            schema.param_count()
        );
        Self {
            log_file: log_file.into(),
            schema,
            x_param,
            scale,
            x_label: x_label.into(),
            y_label: y_label.into(),
            output_path: output_path.into(),
            facet: None,
            palette: Vec::new(),
            sparse: SparsePolicy::Reject,
            width: 500,
            height: 400,
            legend: LegendCorner::UpperLeft,
        }
    }

    /// Retrieves the benchmark log path.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Retrieves the experiment schema records decode under.
    pub fn schema(&self) -> &ExperimentSchema {
        &self.schema
    }

    /// Retrieves the position of the x parameter among the decoded
    /// parameters.
    pub fn x_param(&self) -> usize {
        self.x_param
    }

    /// Retrieves the unit-conversion factor applied to estimates and
    /// bounds.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn facet(&self) -> Option<&FacetSpec> {
        self.facet.as_ref()
    }

    pub fn set_facet(&mut self, facet: FacetSpec) -> &mut Self {
        assert!(
            facet.param() < self.schema.param_count(),
            "facet parameter index {} out of range for a schema with {} parameters",
            facet.param(),
            self.schema.param_count()
        );
        assert!(
            facet.param() != self.x_param,
            "facet parameter cannot be the x parameter"
        );
        self.facet = Some(facet);
        self
    }

    /// Retrieves the explicit color palette: one (light, dark) pair per
    /// facet value, aligned positionally with the facet values. Empty
    /// means the default color cycle.
    pub fn palette(&self) -> &[(String, String)] {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Vec<(&str, &str)>) -> &mut Self {
        self.palette = palette
            .into_iter()
            .map(|(light, dark)| (String::from(light), String::from(dark)))
            .collect();
        self
    }

    pub fn sparse(&self) -> SparsePolicy {
        self.sparse
    }

    pub fn set_sparse(&mut self, sparse: SparsePolicy) -> &mut Self {
        self.sparse = sparse;
        self
    }

    /// Retrieves the artifact dimensions in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: u32, height: u32) -> &mut Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn legend(&self) -> LegendCorner {
        self.legend
    }

    pub fn set_legend(&mut self, legend: LegendCorner) -> &mut Self {
        self.legend = legend;
        self
    }

    /// Retrieves the facet parameter's position within a series'
    /// `fixed_params`, where the x parameter no longer counts.
    pub fn facet_fixed_index(&self) -> Option<usize> {
        self.facet.as_ref().map(|facet| {
            if facet.param() > self.x_param {
                facet.param() - 1
            } else {
                facet.param()
            }
        })
    }
}
