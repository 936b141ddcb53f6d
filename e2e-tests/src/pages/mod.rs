mod advisory_explorer;
mod login;
