//! Render pipelines. The scene is drawn with the single `matcap` pipeline.

pub mod matcap;
