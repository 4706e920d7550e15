//! # Soft-Sensing Store
//!
//! Read-only access to a vibration soft-sensing qualification container.
//!
//! The container is an HDF5 file produced by the acquisition-side conversion
//! tooling: one group per compressor unit, one subgroup per qualification
//! test, each test carrying its operating-condition attributes and two
//! compressed 2-d datasets (`vibrationMeasurements`, `numericalMeasurements`).
//!
//! [`DatasetStore::open`] snapshots the hierarchy once; traversal afterwards
//! never touches the file except for on-demand dataset reads, and never
//! mutates the store, so any number of iterations and parallel readers may
//! run against one handle.
mod container;
mod error;
mod filter;

pub use container::{
    DatasetStore, MeasurementTable, NUMERICAL_DATASET, Test, TestAttributes, Unit,
    VIBRATION_DATASET, columns, compressor_index,
};
pub use error::StoreError;
pub use filter::{TestFilter, filter_tests};

#[cfg(test)]
pub(crate) mod testutil;
