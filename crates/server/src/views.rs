//! HTML views. Templates are embedded at build time and rendered with
//! minijinja; `.html` templates are auto-escaped.

use minijinja::{context, Environment};
use models::User;

const HOME: &str = "home.html";
const FORM: &str = "form.html";
const USER: &str = "user.html";

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(HOME, include_str!("../views/home.html"))?;
        env.add_template(FORM, include_str!("../views/form.html"))?;
        env.add_template(USER, include_str!("../views/user.html"))?;
        Ok(Self { env })
    }

    pub fn home(&self) -> Result<String, minijinja::Error> {
        self.env.get_template(HOME)?.render(context! {})
    }

    /// Create-user form plus the filter form for `GET /users`.
    pub fn form(&self) -> Result<String, minijinja::Error> {
        self.env.get_template(FORM)?.render(context! {})
    }

    pub fn user(&self, user: &User) -> Result<String, minijinja::Error> {
        self.env.get_template(USER)?.render(context! { user => user })
    }
}
