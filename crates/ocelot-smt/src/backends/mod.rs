pub mod smtlib_printer;
pub mod smtlib_writer;
