pub mod environment_loader;
