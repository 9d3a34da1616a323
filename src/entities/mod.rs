pub mod reminder;
pub mod todo;

pub use reminder::Entity as Reminder;
pub use todo::Entity as Todo;
pub use todo::{Priority, Status};
