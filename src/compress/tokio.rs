pub mod archive;
mod async_wrapper;
