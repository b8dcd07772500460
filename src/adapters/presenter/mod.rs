//! Response presentation adapters.

pub mod template;

pub use template::TemplatePresenter;
