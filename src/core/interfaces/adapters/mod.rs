mod lens;

pub use lens::Lens;
