use super::{TidyDnsClient, duplicate_key_message};
use crate::error::{Conflict, Error, Result};
use crate::transport::{Form, Transport};
use crate::types::{InterfaceCreateRequest, InterfaceId, InterfaceInfo, SubnetId, SubnetIdentity};
use crate::wire::{self, FreeIp, InterfaceAck, InterfaceRow, SubnetRow};

impl<T: Transport> TidyDnsClient<T> {
    /// Resolve a CIDR to exactly one subnet. Overlapping matches are an
    /// error rather than a guess.
    pub async fn resolve_subnet(&self, cidr: &str) -> Result<SubnetIdentity> {
        let mut rows: Vec<SubnetRow> = self
            .get_json("subnet list", "/=/dhcp_subnet", &[("subnet", cidr.into())])
            .await?;

        match rows.len() {
            0 => Err(Error::not_found(format!("subnet not found: {cidr}"))),
            1 => Ok(rows.remove(0).into()),
            _ => Err(Error::ambiguous(format!("too many subnets found: {cidr}"))),
        }
    }

    /// Next unused address in the subnet. Nothing is reserved; a concurrent
    /// allocator may receive the same suggestion.
    pub async fn allocate_free_ip(&self, subnet_id: SubnetId) -> Result<String> {
        let free: FreeIp = self
            .get_json(
                "free ip",
                &format!("/=/dhcp_subnet_free_ip/{subnet_id}"),
                &[],
            )
            .await?;
        Ok(free.data.ip_address)
    }

    /// Provision an interface and return its id.
    ///
    /// When the address was taken after it was suggested, this fails with
    /// [`Conflict::AddressInUse`]; allocate a new address and call again.
    pub async fn create_interface(&self, info: &InterfaceCreateRequest) -> Result<InterfaceId> {
        let form = Form::new()
            .field("subnet_id", info.subnet_id)
            .field("zone_id", info.zone_id)
            .field("name", &info.name)
            .field("destination", &info.ip)
            .field("location_id", info.location_id);

        let res = self
            .send_detecting_conflict(
                self.post("/=/dhcp_interface//new", form),
                &duplicate_key_message("destination", &info.ip),
                Conflict::AddressInUse(info.ip.clone()),
            )
            .await?;

        let ack: InterfaceAck = wire::decode("interface create", &res.body)?;
        Ok(ack.id)
    }

    pub async fn read_interface(&self, interface_id: InterfaceId) -> Result<InterfaceInfo> {
        let row: InterfaceRow = self
            .get_json(
                "interface",
                "/=/dhcp_interface/",
                &[("id", interface_id.to_string())],
            )
            .await?;
        Ok(row.into())
    }

    pub async fn rename_interface(
        &self,
        interface_id: InterfaceId,
        name: &str,
    ) -> Result<InterfaceId> {
        let form = Form::new().field("name", name);
        let res = self
            .send_ok(self.post(&format!("/=/dhcp_interface//{interface_id}"), form))
            .await?;

        let ack: InterfaceAck = wire::decode("interface rename", &res.body)?;
        Ok(ack.id)
    }

    pub async fn delete_interface(&self, interface_id: InterfaceId) -> Result<()> {
        self.send_ok(self.delete(&format!("/=/dhcp_interface/{interface_id}")))
            .await?;
        Ok(())
    }
}
