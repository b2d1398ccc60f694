// User profiles that question sets can be attached to. No credentials.

pub mod handlers;
