pub mod annotator;
pub mod contours;
pub mod export;
pub mod locate;
pub mod morphology;
pub mod pipeline;
pub mod preprocess;
pub mod regions;
pub mod screenshot;
pub mod segment;
pub mod types;
