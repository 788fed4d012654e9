pub(crate) mod password;
pub(crate) mod session;
