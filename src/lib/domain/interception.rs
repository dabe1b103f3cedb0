//! Interceptor: decides, per outgoing email, whether the worker delivers it.

mod hooks;
mod interceptor;

pub use hooks::{PayloadFilter, SendObserver};
pub use interceptor::{InterceptDecision, Interceptor, MailInterceptor};

#[cfg(test)]
pub mod tests {
    pub use super::interceptor::MockMailInterceptor;
}
