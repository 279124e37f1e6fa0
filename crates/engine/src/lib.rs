pub use category::Category;
pub use dates::{DateRange, parse_date};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseInput, ExpensePatch, MAX_AMOUNT, NewExpense};
pub use ops::{Engine, EngineBuilder};
pub use summary::{CategoryShare, CategoryTotal, Dashboard, Overview, PeriodTotal};

mod category;
mod dates;
mod error;
mod expenses;
mod ops;
pub mod summary;

type ResultEngine<T> = Result<T, EngineError>;
