pub mod volume_selector;

pub use volume_selector::{RunReport, VolumeSelector};
