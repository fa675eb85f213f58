pub type Window = u32;
