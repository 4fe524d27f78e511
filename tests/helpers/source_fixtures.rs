//! Common source code fixtures for tests.

pub const ANIMALS: &str = r#"class Animal {
    int health;
    function speak();
}

class Dog : Animal {
    function speak();
}
"#;

pub const ANIMALS_PAWN: &str = "enum Class_Animal
{
\thealth
}

stock Class_Animal@speak(this[Class_Animal])
{
}

enum Class_Dog
{
\thealth
}

stock Class_Dog@speak(this[Class_Dog])
{
}
";

/// Base-dialect code around a small class hierarchy.
pub const VEHICLES: &str = r#"#include <a_samp>

class Vehicle {
    float speed = 0.0;
    int wheels = 4;

    function update(float dt) {
        this.speed = this.speed + dt;
    }

    function float getSpeed() {
        return this.speed;
    }
}

class Car : Vehicle {
    bool boosted;

    function update(float dt) {
        super.update(dt);
        if (this.boosted) {
            float extra = dt * 2.0;
            super.update(extra);
        }
    }
}

class Bike : Vehicle {
    function update(float dt) {
        super.update(dt / 2.0);
    }
}

main()
{
    print("ready");
}
"#;

/// A subclass declared before its parent.
pub const FORWARD_PARENT: &str = r#"class Square : Shape {
    int size;
}

class Shape {
    int sides;
}
"#;
