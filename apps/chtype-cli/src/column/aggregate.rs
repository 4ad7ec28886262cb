//! Aggregate functions that can appear in `AggregateFunction(...)` and
//! `SimpleAggregateFunction(...)` column types.

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum AggregateFunction {
    Any,
    AnyHeavy,
    AnyLast,
    ArgMax,
    ArgMin,
    Avg,
    AvgWeighted,
    BoundingRatio,
    Corr,
    Count,
    CovarPop,
    CovarSamp,
    Entropy,
    FirstValue,
    GroupArray,
    GroupArrayInsertAt,
    GroupArrayMovingAvg,
    GroupArrayMovingSum,
    GroupArraySample,
    GroupBitAnd,
    GroupBitOr,
    GroupBitXor,
    GroupBitmap,
    GroupBitmapAnd,
    GroupBitmapOr,
    GroupBitmapXor,
    GroupUniqArray,
    Histogram,
    KurtPop,
    KurtSamp,
    LastValue,
    Max,
    MaxMap,
    Median,
    Min,
    MinMap,
    Quantile,
    QuantileDeterministic,
    QuantileExact,
    QuantileExactWeighted,
    QuantileTDigest,
    QuantileTDigestWeighted,
    QuantileTiming,
    QuantileTimingWeighted,
    Quantiles,
    QuantilesExact,
    QuantilesTDigest,
    QuantilesTiming,
    RankCorr,
    SimpleLinearRegression,
    SkewPop,
    SkewSamp,
    StddevPop,
    StddevSamp,
    StochasticLinearRegression,
    Sum,
    SumMap,
    SumWithOverflow,
    TopK,
    TopKWeighted,
    Uniq,
    UniqCombined,
    UniqCombined64,
    UniqExact,
    UniqHLL12,
    UniqTheta,
    VarPop,
    VarSamp,
    /// Any function missing from the table above. The declared name is kept
    /// in the column's function signature.
    Other,
}

const FUNCTIONS: &[(&str, AggregateFunction)] = &[
    ("any", AggregateFunction::Any),
    ("anyHeavy", AggregateFunction::AnyHeavy),
    ("anyLast", AggregateFunction::AnyLast),
    ("argMax", AggregateFunction::ArgMax),
    ("argMin", AggregateFunction::ArgMin),
    ("avg", AggregateFunction::Avg),
    ("avgWeighted", AggregateFunction::AvgWeighted),
    ("boundingRatio", AggregateFunction::BoundingRatio),
    ("corr", AggregateFunction::Corr),
    ("count", AggregateFunction::Count),
    ("covarPop", AggregateFunction::CovarPop),
    ("covarSamp", AggregateFunction::CovarSamp),
    ("entropy", AggregateFunction::Entropy),
    ("first_value", AggregateFunction::FirstValue),
    ("groupArray", AggregateFunction::GroupArray),
    ("groupArrayInsertAt", AggregateFunction::GroupArrayInsertAt),
    ("groupArrayMovingAvg", AggregateFunction::GroupArrayMovingAvg),
    ("groupArrayMovingSum", AggregateFunction::GroupArrayMovingSum),
    ("groupArraySample", AggregateFunction::GroupArraySample),
    ("groupBitAnd", AggregateFunction::GroupBitAnd),
    ("groupBitOr", AggregateFunction::GroupBitOr),
    ("groupBitXor", AggregateFunction::GroupBitXor),
    ("groupBitmap", AggregateFunction::GroupBitmap),
    ("groupBitmapAnd", AggregateFunction::GroupBitmapAnd),
    ("groupBitmapOr", AggregateFunction::GroupBitmapOr),
    ("groupBitmapXor", AggregateFunction::GroupBitmapXor),
    ("groupUniqArray", AggregateFunction::GroupUniqArray),
    ("histogram", AggregateFunction::Histogram),
    ("kurtPop", AggregateFunction::KurtPop),
    ("kurtSamp", AggregateFunction::KurtSamp),
    ("last_value", AggregateFunction::LastValue),
    ("max", AggregateFunction::Max),
    ("maxMap", AggregateFunction::MaxMap),
    ("median", AggregateFunction::Median),
    ("min", AggregateFunction::Min),
    ("minMap", AggregateFunction::MinMap),
    ("quantile", AggregateFunction::Quantile),
    ("quantileDeterministic", AggregateFunction::QuantileDeterministic),
    ("quantileExact", AggregateFunction::QuantileExact),
    ("quantileExactWeighted", AggregateFunction::QuantileExactWeighted),
    ("quantileTDigest", AggregateFunction::QuantileTDigest),
    ("quantileTDigestWeighted", AggregateFunction::QuantileTDigestWeighted),
    ("quantileTiming", AggregateFunction::QuantileTiming),
    ("quantileTimingWeighted", AggregateFunction::QuantileTimingWeighted),
    ("quantiles", AggregateFunction::Quantiles),
    ("quantilesExact", AggregateFunction::QuantilesExact),
    ("quantilesTDigest", AggregateFunction::QuantilesTDigest),
    ("quantilesTiming", AggregateFunction::QuantilesTiming),
    ("rankCorr", AggregateFunction::RankCorr),
    ("simpleLinearRegression", AggregateFunction::SimpleLinearRegression),
    ("skewPop", AggregateFunction::SkewPop),
    ("skewSamp", AggregateFunction::SkewSamp),
    ("stddevPop", AggregateFunction::StddevPop),
    ("stddevSamp", AggregateFunction::StddevSamp),
    ("stochasticLinearRegression", AggregateFunction::StochasticLinearRegression),
    ("sum", AggregateFunction::Sum),
    ("sumMap", AggregateFunction::SumMap),
    ("sumWithOverflow", AggregateFunction::SumWithOverflow),
    ("topK", AggregateFunction::TopK),
    ("topKWeighted", AggregateFunction::TopKWeighted),
    ("uniq", AggregateFunction::Uniq),
    ("uniqCombined", AggregateFunction::UniqCombined),
    ("uniqCombined64", AggregateFunction::UniqCombined64),
    ("uniqExact", AggregateFunction::UniqExact),
    ("uniqHLL12", AggregateFunction::UniqHLL12),
    ("uniqTheta", AggregateFunction::UniqTheta),
    ("varPop", AggregateFunction::VarPop),
    ("varSamp", AggregateFunction::VarSamp),
];

/// Suffixes the server lets you append to any aggregate function.
/// Longer suffixes come first so `MergeState` is not read as `State`.
const COMBINATORS: &[&str] = &[
    "simplestate",
    "mergestate",
    "ordefault",
    "resample",
    "distinct",
    "foreach",
    "ornull",
    "state",
    "merge",
    "array",
    "map",
    "if",
];

lazy_static! {
    static ref BY_NAME: HashMap<String, AggregateFunction> = FUNCTIONS
        .iter()
        .map(|(name, function)| (name.to_ascii_lowercase(), *function))
        .collect();
}

impl AggregateFunction {
    /// Resolves a declared function name, looking through combinator
    /// suffixes (`sumIf`, `uniqMergeState`) to the base function.
    pub fn resolve(declared: &str) -> Option<AggregateFunction> {
        let mut candidate = declared.to_ascii_lowercase();
        loop {
            if let Some(function) = BY_NAME.get(&candidate) {
                return Some(*function);
            }
            let stripped = COMBINATORS.iter().find_map(|suffix| {
                candidate
                    .strip_suffix(suffix)
                    .filter(|base| !base.is_empty())
                    .map(str::to_string)
            })?;
            candidate = stripped;
        }
    }

    /// Like [`AggregateFunction::resolve`], but never fails: the server owns
    /// the function catalog, so unlisted names become [`AggregateFunction::Other`].
    pub fn resolve_or_other(declared: &str) -> AggregateFunction {
        Self::resolve(declared).unwrap_or(AggregateFunction::Other)
    }

    pub fn name(&self) -> &'static str {
        if *self == AggregateFunction::Other {
            return "other";
        }
        FUNCTIONS
            .iter()
            .find(|(_, function)| function == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }
}

impl From<AggregateFunction> for &'static str {
    fn from(function: AggregateFunction) -> Self {
        function.name()
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact() {
        assert_eq!(
            AggregateFunction::resolve("groupBitmap"),
            Some(AggregateFunction::GroupBitmap)
        );
        assert_eq!(
            AggregateFunction::resolve("quantiles"),
            Some(AggregateFunction::Quantiles)
        );
        assert_eq!(
            AggregateFunction::resolve("uniqCombined64"),
            Some(AggregateFunction::UniqCombined64)
        );
        assert_eq!(AggregateFunction::resolve("SUM"), Some(AggregateFunction::Sum));
    }

    #[test]
    fn test_resolve_combinators() {
        assert_eq!(AggregateFunction::resolve("sumIf"), Some(AggregateFunction::Sum));
        assert_eq!(AggregateFunction::resolve("sumMap"), Some(AggregateFunction::SumMap));
        assert_eq!(
            AggregateFunction::resolve("uniqMergeState"),
            Some(AggregateFunction::Uniq)
        );
        assert_eq!(
            AggregateFunction::resolve("argMaxIfState"),
            Some(AggregateFunction::ArgMax)
        );
        assert_eq!(AggregateFunction::resolve("noSuchFunction"), None);
        assert_eq!(AggregateFunction::resolve("If"), None);
    }

    #[test]
    fn test_unlisted_functions_fall_back() {
        assert_eq!(
            AggregateFunction::resolve_or_other("windowFunnel"),
            AggregateFunction::Other
        );
        assert_eq!(
            AggregateFunction::resolve_or_other("uniqIf"),
            AggregateFunction::Uniq
        );
        assert_eq!(AggregateFunction::Other.name(), "other");
    }

    #[test]
    fn test_names() {
        assert_eq!(AggregateFunction::FirstValue.name(), "first_value");
        assert_eq!(AggregateFunction::UniqHLL12.to_string(), "uniqHLL12");
    }
}
