pub mod territory {
    /// Steering input for the controlled agent.
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct ControlInput {
        #[prost(float, tag = "1")]
        pub x: f32,
        #[prost(float, tag = "2")]
        pub y: f32,
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct AgentState {
        /// Owner index, 1 for the controlled agent and 2..=4 for bots
        #[prost(uint32, tag = "1")]
        pub owner: u32,
        #[prost(float, tag = "2")]
        pub x: f32,
        #[prost(float, tag = "3")]
        pub y: f32,
        /// 0 = explore, 1 = pursue
        #[prost(uint32, tag = "4")]
        pub mode: u32,
    }

    /// Full board and agent snapshot for renderers.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TerritorySnapshot {
        #[prost(uint32, tag = "1")]
        pub width: u32,
        #[prost(uint32, tag = "2")]
        pub height: u32,
        /// Owner index per tile, row-major with y as the outer index
        #[prost(uint32, repeated, tag = "3")]
        pub tiles: ::prost::alloc::vec::Vec<u32>,
        #[prost(message, repeated, tag = "4")]
        pub agents: ::prost::alloc::vec::Vec<AgentState>,
        #[prost(float, tag = "5")]
        pub remaining_time: f32,
        #[prost(bool, tag = "6")]
        pub running: bool,
        #[prost(bool, tag = "7")]
        pub paused: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::territory::*;
    use prost::Message;

    #[test]
    fn test_snapshot_tiles_are_packed() {
        let snapshot = TerritorySnapshot {
            width: 2,
            height: 2,
            tiles: vec![0, 1, 2, 0],
            agents: vec![AgentState {
                owner: 1,
                x: 0.5,
                y: 1.0,
                mode: 0,
            }],
            remaining_time: 12.5,
            running: true,
            paused: false,
        };

        let bytes = snapshot.encode_to_vec();
        // tag 3, wire type 2 (length-delimited), then four one-byte varints
        assert!(bytes.windows(6).any(|w| w == [0x1a, 4, 0, 1, 2, 0]));
        assert_eq!(TerritorySnapshot::decode(bytes.as_slice()).unwrap(), snapshot);
    }

    #[test]
    fn test_empty_input_decodes_to_zero() {
        let input = ControlInput::decode(&[][..]).unwrap();
        assert_eq!(input, ControlInput { x: 0.0, y: 0.0 });
    }
}
