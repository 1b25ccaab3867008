//! # Channel Handshake Choreography
//!
//! OpenInit → OpenTry → OpenAck → OpenConfirm between two modules, plus
//! each rejection a misconfigured counterparty can trigger.

#[cfg(test)]
mod tests {
    use crate::harness::{Chain, TestNet, CHANNEL, PORT};
    use ibc_links::ports::CapabilityKeeper;
    use ibc_links::{
        CapabilityPath, ChannelOpenRequest, ChannelValidationError, Counterparty, IbcModule,
        LinksError, Order,
    };

    fn rejection(result: Result<(), LinksError>) -> ChannelValidationError {
        match result {
            Err(LinksError::ChannelValidation(err)) => err,
            other => panic!("expected channel validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_handshake_claims_capability_on_both_ends() {
        let net = TestNet::connect();
        let path = CapabilityPath::channel(PORT, CHANNEL);

        for chain in [&net.origin, &net.receiver] {
            assert!(chain.substrate.capabilities.get_capability(&path).is_some());
        }
    }

    #[test]
    fn test_ordered_channel_rejected_without_claim() {
        let chain = Chain::new("desmos");
        let request = chain.channel_request(
            "channel-1",
            Order::Ordered,
            Counterparty::new(PORT, "channel-1"),
            "links-1",
        );

        let err = rejection(chain.module.on_chan_open_try(&request, "links-1"));
        assert!(matches!(
            err,
            ChannelValidationError::InvalidOrdering { .. }
        ));
        assert!(chain
            .substrate
            .capabilities
            .get_capability(&CapabilityPath::channel(PORT, "channel-1"))
            .is_none());
    }

    #[test]
    fn test_channel_sequence_above_u32_rejected() {
        let chain = Chain::new("cosmos");
        let request = chain.channel_request(
            "channel-4294967296",
            Order::Unordered,
            Counterparty::new(PORT, ""),
            "links-1",
        );

        let err = rejection(chain.module.on_chan_open_init(&request));
        assert!(matches!(
            err,
            ChannelValidationError::MaxChannelsExceeded { .. }
        ));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let chain = Chain::new("cosmos");
        let request = chain.channel_request(
            "channel-2",
            Order::Unordered,
            Counterparty::new(PORT, ""),
            "ics20-1",
        );

        let err = rejection(chain.module.on_chan_open_init(&request));
        assert!(matches!(err, ChannelValidationError::InvalidVersion { .. }));
    }

    #[test]
    fn test_wrong_counterparty_version_rejected() {
        let chain = Chain::new("desmos");
        let request = chain.channel_request(
            "channel-2",
            Order::Unordered,
            Counterparty::new(PORT, "channel-7"),
            "links-1",
        );

        let err = rejection(chain.module.on_chan_open_try(&request, "links-0"));
        assert!(matches!(
            err,
            ChannelValidationError::InvalidCounterpartyVersion { .. }
        ));
    }

    #[test]
    fn test_users_cannot_close() {
        let net = TestNet::connect();
        let err = rejection(net.origin.module.on_chan_close_init(PORT, CHANNEL));
        assert_eq!(err, ChannelValidationError::CloseNotAllowed);
        let receiver = &net.receiver.module;
        assert!(receiver.on_chan_close_confirm(PORT, CHANNEL).is_ok());
    }

    /// One field broken away from a valid request.
    struct Case {
        name: &'static str,
        channel_id: &'static str,
        break_field: fn(&mut ChannelOpenRequest),
        expected: fn(&ChannelValidationError) -> bool,
    }

    fn single_field_cases() -> Vec<Case> {
        vec![
            Case {
                name: "ordering",
                channel_id: "channel-3",
                break_field: |r| r.order = Order::Ordered,
                expected: |e| matches!(e, ChannelValidationError::InvalidOrdering { .. }),
            },
            Case {
                name: "sequence",
                channel_id: "channel-4",
                break_field: |r| r.channel_id = "channel-4294967296".to_string(),
                expected: |e| matches!(e, ChannelValidationError::MaxChannelsExceeded { .. }),
            },
            Case {
                name: "port",
                channel_id: "channel-5",
                break_field: |r| r.port_id = "transfer".to_string(),
                expected: |e| matches!(e, ChannelValidationError::InvalidPort { .. }),
            },
            Case {
                name: "version",
                channel_id: "channel-6",
                break_field: |r| r.version = "ics20-1".to_string(),
                expected: |e| matches!(e, ChannelValidationError::InvalidVersion { .. }),
            },
        ]
    }

    fn assert_fix_and_resubmit(
        chain: &Chain,
        case: &Case,
        submit: impl Fn(&ChannelOpenRequest) -> Result<(), LinksError>,
    ) {
        let valid = chain.channel_request(
            case.channel_id,
            Order::Unordered,
            Counterparty::new(PORT, case.channel_id),
            "links-1",
        );
        let path = CapabilityPath::channel(PORT, case.channel_id);

        let mut broken = valid.clone();
        (case.break_field)(&mut broken);
        let err = rejection(submit(&broken));
        assert!((case.expected)(&err), "{}: unexpected {err:?}", case.name);
        assert!(
            chain.substrate.capabilities.get_capability(&path).is_none(),
            "{}: capability claimed on rejection",
            case.name
        );

        assert!(submit(&valid).is_ok(), "{}: resubmit failed", case.name);
        assert_eq!(
            chain.substrate.capabilities.get_capability(&path),
            Some(valid.capability),
            "{}: capability not claimed after resubmit",
            case.name
        );
    }

    #[test]
    fn test_open_init_single_field_fix_succeeds() {
        for case in single_field_cases() {
            let chain = Chain::new("cosmos");
            assert_fix_and_resubmit(&chain, &case, |r| chain.module.on_chan_open_init(r));
        }
    }

    #[test]
    fn test_open_try_single_field_fix_succeeds() {
        for case in single_field_cases() {
            let chain = Chain::new("desmos");
            assert_fix_and_resubmit(&chain, &case, |r| {
                chain.module.on_chan_open_try(r, "links-1")
            });
        }
    }
}
