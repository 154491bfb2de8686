//! Animal taxonomy
//!
//! The smallest corner of the example domain: a trait with single-level
//! overriding, nothing more.

/// An animal that can introduce itself
pub trait Animal {
    fn name(&self) -> &str;

    fn voice(&self) -> String;

    fn legs(&self) -> u8 {
        4
    }

    fn describe(&self) -> String {
        format!("{} ({} legs) says {}", self.name(), self.legs(), self.voice())
    }
}

#[derive(Debug, Default)]
pub struct Cat;

impl Animal for Cat {
    fn name(&self) -> &str {
        "cat"
    }

    fn voice(&self) -> String {
        "meow".to_string()
    }
}

#[derive(Debug, Default)]
pub struct Dog;

impl Animal for Dog {
    fn name(&self) -> &str {
        "dog"
    }

    fn voice(&self) -> String {
        "woof".to_string()
    }
}

#[derive(Debug, Default)]
pub struct Snake;

impl Animal for Snake {
    fn name(&self) -> &str {
        "snake"
    }

    fn voice(&self) -> String {
        "hiss".to_string()
    }

    fn legs(&self) -> u8 {
        0
    }

    fn describe(&self) -> String {
        format!("{} slithers by and says {}", self.name(), self.voice())
    }
}

#[derive(Debug, Default)]
pub struct Hawk;

impl Animal for Hawk {
    fn name(&self) -> &str {
        "hawk"
    }

    fn voice(&self) -> String {
        "screech".to_string()
    }

    fn legs(&self) -> u8 {
        2
    }
}

/// Every animal the demo parades through the console
pub fn menagerie() -> Vec<Box<dyn Animal>> {
    vec![
        Box::new(Cat),
        Box::new(Dog),
        Box::new(Snake),
        Box::new(Hawk),
    ]
}
