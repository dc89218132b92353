mod codec;
mod schedule_file;
