pub mod cvp;
pub mod depreciation;
pub mod investment;
pub mod loan;
pub mod reaction;
