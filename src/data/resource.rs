//! The fixed catalogue of JSON artifacts and their typed decoding.

use serde::de::DeserializeOwned;

use crate::chart::{ChartSpec, Figure};
use crate::domain::{
    HeadRow, HypothesisTests, MissingnessResults, ModelResults, PivotRow, SummaryStats,
};

use super::FetchError;

/// One JSON file under the data base location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    SummaryStats,
    HeadData,
    PivotTable,
    PlotUnivariate,
    PlotObjConversion,
    PlotWinRate,
    PlotLiiScatter,
    HypothesisTests,
    Test1Objectives,
    Test2WinRate,
    MissingnessResults,
    MissingnessTest1,
    MissingnessTest2,
    ModelResults,
}

impl Resource {
    pub const ALL: [Resource; 14] = [
        Resource::SummaryStats,
        Resource::HeadData,
        Resource::PivotTable,
        Resource::PlotUnivariate,
        Resource::PlotObjConversion,
        Resource::PlotWinRate,
        Resource::PlotLiiScatter,
        Resource::HypothesisTests,
        Resource::Test1Objectives,
        Resource::Test2WinRate,
        Resource::MissingnessResults,
        Resource::MissingnessTest1,
        Resource::MissingnessTest2,
        Resource::ModelResults,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Resource::SummaryStats => "summary_stats.json",
            Resource::HeadData => "head_data.json",
            Resource::PivotTable => "pivot_table.json",
            Resource::PlotUnivariate => "plot_univariate.json",
            Resource::PlotObjConversion => "plot_obj_conversion.json",
            Resource::PlotWinRate => "plot_winrate.json",
            Resource::PlotLiiScatter => "plot_lii_scatter.json",
            Resource::HypothesisTests => "hypothesis_tests.json",
            Resource::Test1Objectives => "test1_objectives.json",
            Resource::Test2WinRate => "test2_winrate.json",
            Resource::MissingnessResults => "missingness_results.json",
            Resource::MissingnessTest1 => "missingness_test_1.json",
            Resource::MissingnessTest2 => "missingness_test_2.json",
            Resource::ModelResults => "model_results.json",
        }
    }

    pub fn is_chart(self) -> bool {
        matches!(
            self,
            Resource::PlotUnivariate
                | Resource::PlotObjConversion
                | Resource::PlotWinRate
                | Resource::PlotLiiScatter
                | Resource::Test1Objectives
                | Resource::Test2WinRate
                | Resource::MissingnessTest1
                | Resource::MissingnessTest2
        )
    }

    /// Decode raw bytes into this resource's document type.
    pub fn decode(self, bytes: &[u8]) -> Result<Document, FetchError> {
        Ok(match self {
            Resource::SummaryStats => Document::SummaryStats(parse(self, bytes)?),
            Resource::HeadData => Document::HeadData(parse(self, bytes)?),
            Resource::PivotTable => Document::PivotTable(parse(self, bytes)?),
            Resource::HypothesisTests => Document::HypothesisTests(parse(self, bytes)?),
            Resource::MissingnessResults => Document::MissingnessResults(parse(self, bytes)?),
            Resource::ModelResults => Document::ModelResults(parse(self, bytes)?),
            Resource::PlotUnivariate
            | Resource::PlotObjConversion
            | Resource::PlotWinRate
            | Resource::PlotLiiScatter
            | Resource::Test1Objectives
            | Resource::Test2WinRate
            | Resource::MissingnessTest1
            | Resource::MissingnessTest2 => {
                let spec: ChartSpec = parse(self, bytes)?;
                Document::Chart(Figure::from_spec(spec))
            }
        })
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

fn parse<T: DeserializeOwned>(resource: Resource, bytes: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(bytes).map_err(|source| FetchError::Decode {
        resource: resource.file_name(),
        source,
    })
}

/// A decoded artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    SummaryStats(SummaryStats),
    HeadData(Vec<HeadRow>),
    PivotTable(Vec<PivotRow>),
    Chart(Figure),
    HypothesisTests(HypothesisTests),
    MissingnessResults(MissingnessResults),
    ModelResults(ModelResults),
}
