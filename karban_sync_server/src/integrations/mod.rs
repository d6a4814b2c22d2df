pub mod unicommerce;
