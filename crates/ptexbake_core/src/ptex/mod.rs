mod adjacency;
mod archive;
mod atlas;
mod buffer;
mod bytes;
mod compression;
mod error;
mod filter;
mod interp;
mod io;
mod layer;
mod layout;
mod mesh;
mod raster;
mod resource;
mod texel;

/// Edge-to-polygon adjacency index types.
pub use adjacency::{AdjSlot, AdjacencyIndex, EdgeAdjacency, MAX_ADJ_POLYS};
/// Multi-subimage archive reader/writer and the source/sink seams.
pub use archive::{ArchiveFace, ArchiveHeader, ArchiveReader, ArchiveWriter, SubimageSink, SubimageSource};
/// Packed atlas image and pack/unpack entry points.
pub use atlas::{AtlasImage, PackOptions, PackResult, pack_loops, update_from_image};
/// Owned image buffer used for copies, resampling, and quad splitting.
pub use buffer::{ImageBuf, TexelData};
/// Compression detection result.
pub use compression::Compression;
/// Error and result aliases.
pub use error::{PtexError, Result};
/// Seam filtering types and entry points.
pub use filter::{AdjacentEdge, FilterReport, Side, adjacent_edge, filter_borders, rect_borders_update};
/// Loop interpolation records for tessellated faces.
pub use interp::{LoopInterp, TessFacePtex, inject_loop_interp, tess_face_interp};
/// Import/export between archives and per-loop layers.
pub use io::{ExportOptions, export, export_file, import, import_file, import_loop, import_quad};
/// Per-mesh named raster layers.
pub use layer::{PtexLayer, PtexLayers};
/// Rectangle packing layout.
pub use layout::{PackedLayout, PackedPlacement, PackedRegion};
/// Mesh topology accessors.
pub use mesh::{Edge, Loop, Mesh, MeshDesc, Poly};
/// Per-loop raster store.
pub use raster::{DEFAULT_PIXEL, LoopPtex};
/// Higher-level image resource owning a packed atlas.
pub use resource::Image;
/// Texel layout and resolution descriptors.
pub use texel::{DataType, LogRes, Res, TexelInfo, rect_num_bytes, u8_to_unit_float, unit_float_to_u8};
