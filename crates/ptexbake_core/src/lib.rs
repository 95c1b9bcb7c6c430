//! Public library API for Ptex per-face texel storage, border filtering, and atlas packing.

/// Per-loop rasters, mesh adjacency, seam filtering, atlas packing, and archive IO.
pub mod ptex;
