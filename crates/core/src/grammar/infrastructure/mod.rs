pub mod fsg_file_writer;
