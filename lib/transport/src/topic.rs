use std::fmt;

#[derive(Debug, PartialEq)]
pub enum Topic {
    Request,
    Response(String),
    Accessories,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Topic::Request => write!(f, "homekit/request"),
            Topic::Response(request_id) => write!(f, "homekit/response/{}", request_id),
            Topic::Accessories => write!(f, "homekit/accessories"),
        }
    }
}
