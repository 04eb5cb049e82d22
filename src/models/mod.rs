mod employee;

pub use employee::{Employee, NewEmployee, UpdateEmployee};
