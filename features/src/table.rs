//! The in-memory output table assembled by the pipeline.
use crate::error::FeatureError;
use soft_sensing_common::Real;

/// A single feature value: one scalar or one fixed-length vector.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Scalar(Real),
    Vector(Vec<Real>),
}

impl FeatureValue {
    /// Number of scalar columns this value expands to.
    pub fn width(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Vector(values) => values.len(),
        }
    }
}

/// An ordered name→value feature mapping produced by an extractor for one
/// slice. Order is preserved into the output table's columns.
pub type FeatureSet = Vec<(String, FeatureValue)>;

/// Per-test metadata replicated onto each of the test's rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMetadata {
    /// Compressor index parsed from the unit identifier.
    pub unit: u32,
    /// Target speed from the `angularSpeed` attribute.
    pub rpm: i64,
    /// Evaporating set point, sign applied (the attribute is magnitude only).
    pub t_evap_ref: Real,
    /// Condensing set point.
    pub t_cond_ref: Real,
    /// Mean measured evaporating temperature.
    pub t_evap: Real,
    /// Mean measured condensing temperature.
    pub t_cond: Real,
    /// Mean measured suction pressure.
    pub p_suc: Real,
    /// Mean measured discharge pressure.
    pub p_dis: Real,
}

impl RowMetadata {
    /// Metadata column names, in output order.
    pub const COLUMNS: [&'static str; 8] = [
        "unit",
        "rpm",
        "t_evap_ref",
        "t_cond_ref",
        "t_evap",
        "t_cond",
        "p_suc",
        "p_dis",
    ];

    /// The metadata as scalar column values, in [`Self::COLUMNS`] order.
    pub fn values(&self) -> [Real; 8] {
        [
            self.unit as Real,
            self.rpm as Real,
            self.t_evap_ref,
            self.t_cond_ref,
            self.t_evap,
            self.t_cond,
            self.p_suc,
            self.p_dis,
        ]
    }
}

/// One output row: test metadata merged with one slice's features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub metadata: RowMetadata,
    pub features: FeatureSet,
}

impl FeatureRow {
    /// Looks up a feature value by column name.
    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.features
            .iter()
            .find(|(feature, _)| feature == name)
            .map(|(_, value)| value)
    }
}

/// The assembled output table.
///
/// Columns are the fixed metadata set followed by the extractor's feature
/// columns in extractor order. Consumers rely on every row having the same
/// shape, so appending a row whose feature names or vector widths disagree
/// with the first row fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    feature_shape: Vec<(String, usize)>,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row, locking the feature shape on first append.
    pub fn push(&mut self, row: FeatureRow) -> Result<(), FeatureError> {
        let shape: Vec<(String, usize)> = row
            .features
            .iter()
            .map(|(name, value)| (name.clone(), value.width()))
            .collect();
        if self.rows.is_empty() {
            self.feature_shape = shape;
        } else if shape != self.feature_shape {
            return Err(FeatureError::Shape {
                reason: format!(
                    "row features {:?} do not match table features {:?}",
                    shape, self.feature_shape
                ),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Feature column names in table order.
    pub fn feature_columns(&self) -> impl Iterator<Item = &str> {
        self.feature_shape.iter().map(|(name, _)| name.as_str())
    }

    /// All column names, metadata first, with each vector feature expanded
    /// to `name_0 .. name_{width-1}`.
    pub fn flat_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = RowMetadata::COLUMNS
            .iter()
            .map(|&name| name.to_owned())
            .collect();
        for (name, width) in &self.feature_shape {
            if *width == 1 {
                columns.push(name.clone());
            } else {
                columns.extend((0..*width).map(|index| format!("{name}_{index}")));
            }
        }
        columns
    }

    /// One row as flat scalar values, aligned with [`Self::flat_columns`].
    pub fn flat_row(&self, index: usize) -> Option<Vec<Real>> {
        let row = self.rows.get(index)?;
        let mut values: Vec<Real> = row.metadata.values().to_vec();
        for (_, value) in &row.features {
            match value {
                FeatureValue::Scalar(scalar) => values.push(*scalar),
                FeatureValue::Vector(vector) => values.extend_from_slice(vector),
            }
        }
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> RowMetadata {
        RowMetadata {
            unit: 2,
            rpm: 3600,
            t_evap_ref: -15.0,
            t_cond_ref: 40.0,
            t_evap: 5.0,
            t_cond: 45.0,
            p_suc: 1.2,
            p_dis: 8.4,
        }
    }

    fn row(features: FeatureSet) -> FeatureRow {
        FeatureRow {
            metadata: metadata(),
            features,
        }
    }

    #[test]
    fn first_row_locks_the_shape() {
        let mut table = FeatureTable::new();
        table
            .push(row(vec![
                ("x".to_owned(), FeatureValue::Vector(vec![1.0, 2.0])),
                ("rms".to_owned(), FeatureValue::Scalar(0.5)),
            ]))
            .unwrap();
        assert_eq!(
            table.feature_columns().collect::<Vec<_>>(),
            ["x", "rms"]
        );

        let err = table
            .push(row(vec![(
                "x".to_owned(),
                FeatureValue::Vector(vec![1.0, 2.0, 3.0]),
            )]))
            .unwrap_err();
        assert!(matches!(err, FeatureError::Shape { .. }));
    }

    #[test]
    fn flat_columns_expand_vectors() {
        let mut table = FeatureTable::new();
        table
            .push(row(vec![
                ("x".to_owned(), FeatureValue::Vector(vec![1.0, 2.0])),
                ("rms_x".to_owned(), FeatureValue::Scalar(0.5)),
            ]))
            .unwrap();
        let columns = table.flat_columns();
        assert_eq!(columns[..8], RowMetadata::COLUMNS.map(String::from)[..]);
        assert_eq!(columns[8..], ["x_0", "x_1", "rms_x"].map(String::from)[..]);
    }

    #[test]
    fn flat_row_aligns_with_flat_columns() {
        let mut table = FeatureTable::new();
        table
            .push(row(vec![
                ("x".to_owned(), FeatureValue::Vector(vec![1.0, 2.0])),
                ("rms_x".to_owned(), FeatureValue::Scalar(0.5)),
            ]))
            .unwrap();
        let values = table.flat_row(0).unwrap();
        assert_eq!(values.len(), table.flat_columns().len());
        assert_eq!(values[..2], [2.0, 3600.0][..]);
        assert_eq!(values[8..], [1.0, 2.0, 0.5][..]);
    }

    #[test]
    fn feature_lookup_by_name() {
        let sample = row(vec![("rms_x".to_owned(), FeatureValue::Scalar(0.5))]);
        assert_eq!(
            sample.feature("rms_x"),
            Some(&FeatureValue::Scalar(0.5))
        );
        assert_eq!(sample.feature("rms_y"), None);
    }
}
