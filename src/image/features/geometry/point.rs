use std::ops::{Add,Sub};
use serde::{Serialize, Deserialize};

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T
}

impl<T> Point<T> {
    pub fn new(x: T, y:T) -> Point<T> {
        Point{x,y}
    }
}

impl<T: Add<Output = T>> Add for Point<T> {
    type Output = Point<T>;
    fn add(self, other: Point<T>) -> Point<T> {
        Point{x: self.x + other.x, y: self.y + other.y}
    }
}

impl<T: Sub<Output = T>> Sub for Point<T> {
    type Output = Point<T>;
    fn sub(self, other: Point<T>) -> Point<T> {
        Point{x: self.x - other.x, y: self.y - other.y}
    }
}
