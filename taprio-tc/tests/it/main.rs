mod options;
mod request;
