pub mod article;
pub mod feedback;

pub use article::Article;
pub use feedback::{Feedback, Icon, Item, ItemText};
