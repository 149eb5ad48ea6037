mod requests;
mod responses;

pub use requests::{CommentForm, LoginForm, LoginQuery, RegisterForm};
pub use responses::{HealthResponse, HomeUserView, UserView};
