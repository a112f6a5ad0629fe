use crate::runtime::contract::InstanceObservation;

pub trait InstanceControl {
    fn describe_instance(&self) -> Result<InstanceObservation, String>;
    fn start_instance(&self) -> Result<(), String>;
    fn stop_instance(&self) -> Result<(), String>;
}
