use std::fmt;

pub struct Counter {
    count: u32,
}

impl Counter {
    pub fn bump(&mut self) {
        if self.count < 10 {
            self.count += 1;
        }
        log(self.count);
    }
}

fn log(n: u32) {
    fn inner() {}
    println!("{}", n);
    inner();
}
