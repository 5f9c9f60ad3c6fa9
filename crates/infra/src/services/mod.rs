mod channel;
mod classifier;

pub use channel::{Delivery, DeliveryError, IChannel, InMemoryChannel, WebhookChannel};
pub use classifier::{HttpIntentClassifier, IIntentClassifier, InMemoryClassifier};
