/// Synthetic layer export command.
pub mod bake;
/// Archive header and face table command.
pub mod info;
/// Atlas packing and seam filtering command.
pub mod pack;
/// Layer resampling command.
pub mod resize;

#[cfg(test)]
mod test_support;
mod util;
